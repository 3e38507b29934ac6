//! Pipeline configuration

use std::fmt;

use crate::error::{Error, Result};
use crate::mgs::Enrichment;
use crate::model::SamplerConfig;

/// Which sample preparations are fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Viral-enriched samples; brinch is fit unfiltered
    #[default]
    Standard,
    /// Panel-enriched samples; brinch and spurbeck are skipped
    Panel,
}

impl FitMode {
    /// Enrichment filter for a study, or `None` when the study is skipped
    ///
    /// The outer `Option` says whether the study is fit at all, the inner one
    /// is the filter handed to the dataset.
    #[must_use]
    pub fn enrichment_for(self, study: &str) -> Option<Option<Enrichment>> {
        match (self, study) {
            (Self::Standard, "brinch") => Some(None),
            (Self::Standard, _) => Some(Some(Enrichment::Viral)),
            (Self::Panel, "brinch" | "spurbeck") => None,
            (Self::Panel, _) => Some(Some(Enrichment::Panel)),
        }
    }

    /// Prefix of every output file
    #[must_use]
    pub const fn output_prefix(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::Panel => "panel_",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Panel => f.write_str("panel"),
        }
    }
}

/// Configuration of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Sampler settings for every fit
    pub sampler: SamplerConfig,
    /// Worker threads; defaults to the number of logical CPUs
    pub threads: usize,
    /// Sample preparations to fit
    pub mode: FitMode,
    /// Also fit pathogens selected in the second round
    pub include_round_2: bool,
    /// Show progress bars
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            threads: num_cpus::get(),
            mode: FitMode::default(),
            include_round_2: false,
            show_progress: true,
        }
    }
}

impl PipelineConfig {
    /// Create a builder starting from the defaults
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Output file name for a table in this configuration's mode
    #[must_use]
    pub fn output_file(&self, table: &str) -> String {
        format!("{}{table}.tsv", self.mode.output_prefix())
    }

    /// Check the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::Config("threads must be at least 1".to_string()));
        }
        self.sampler.validate()
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Start from the defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampler settings
    #[must_use]
    pub fn sampler(mut self, sampler: SamplerConfig) -> Self {
        self.config.sampler = sampler;
        self
    }

    /// Set the number of posterior draws per chain
    #[must_use]
    pub const fn num_samples(mut self, num_samples: usize) -> Self {
        self.config.sampler.num_samples = num_samples;
        self
    }

    /// Set the number of chains
    #[must_use]
    pub const fn num_chains(mut self, num_chains: usize) -> Self {
        self.config.sampler.num_chains = num_chains;
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub const fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    /// Set the fit mode
    #[must_use]
    pub const fn mode(mut self, mode: FitMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Include second round pathogens
    #[must_use]
    pub const fn include_round_2(mut self, include: bool) -> Self {
        self.config.include_round_2 = include;
        self
    }

    /// Show or hide progress bars
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
