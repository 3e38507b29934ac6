//! Model building and Bayesian fitting
//!
//! [`build_model`] joins sequencing samples with the estimates that best
//! apply to them; [`Model::fit_model`] then samples the posterior of the
//! relative abundance at 1 in 100 (`ra_at_1in100`) for every sampling
//! location and for the study as a whole.
//!
//! A model moves from [`ModelState::Built`] to [`ModelState::Fit`]; posterior
//! accessors fail with [`Error::ModelNotFit`] until it has been fit.

pub mod diagnostics;
pub mod sampler;
pub mod summary;

pub use sampler::{SamplerConfig, SamplerConfigBuilder};
pub use summary::SummaryStats;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::estimate::Predictor;
use crate::matching::Matcher;
use crate::mgs::{BioProject, Enrichment, Sample, SequencingData};
use crate::pathogens::TaxIds;
use sampler::{ChainDraws, LOG_PHI, LOG_SIGMA, Target, log_theta};

/// Predictor value treated as a cumulative incidence of 1 in 100
pub const REFERENCE_SCALE: f64 = 1000.0;

/// Location label of the study-level coefficient
pub const OVERALL: &str = "Overall";

/// One sample joined with its matched predictors
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    /// Sample accession
    pub sample: Sample,
    /// Bioproject the sample belongs to
    pub bioproject: BioProject,
    /// Collection date
    pub date: NaiveDate,
    /// Country
    pub country: String,
    /// State
    pub state: Option<String>,
    /// County
    pub county: Option<String>,
    /// Grouping location
    pub location: String,
    /// Sub-location, when reported
    pub fine_location: Option<String>,
    /// Preparation category
    pub enrichment: Option<Enrichment>,
    /// Total reads
    pub total_reads: u64,
    /// Reads assigned to the pathogen's taxids
    pub viral_reads: u64,
    /// Every predictor value tied for the best match
    pub matched: SmallVec<[f64; 4]>,
}

impl InputRow {
    /// Mean of the matched predictor values, if any matched
    #[must_use]
    pub fn predictor(&self) -> Option<f64> {
        if self.matched.is_empty() {
            None
        } else {
            Some(self.matched.iter().sum::<f64>() / self.matched.len() as f64)
        }
    }

    /// Whether the row enters the likelihood
    ///
    /// Rows without reads or without a positive predictor carry no
    /// information about the abundance and stay in the table only.
    #[must_use]
    pub fn is_fittable(&self) -> bool {
        self.total_reads > 0 && self.predictor().is_some_and(|p| p > 0.0)
    }
}

/// Posterior of `ra_at_1in100` for one location
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    /// Sampling location, or [`OVERALL`] for the study level
    pub location: String,
    /// Draws pooled over chains, in chain order
    pub draws: Vec<f64>,
    /// Summary of the draws
    pub summary: SummaryStats,
}

/// Fitted values for one observation
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutput {
    /// Sample accession
    pub sample: Sample,
    /// Grouping location
    pub location: String,
    /// Collection date
    pub date: NaiveDate,
    /// Observed viral reads
    pub viral_reads: u64,
    /// Total reads
    pub total_reads: u64,
    /// Predictor value used
    pub predictor: f64,
    /// Posterior of the expected viral read count
    pub expected_reads: SummaryStats,
}

/// Output of a completed fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Per-location and overall coefficients
    pub coefficients: Vec<Coefficient>,
    /// Fitted values per observation
    pub output_by_sample: Vec<SampleOutput>,
    /// Split R-hat per monitored parameter, when it could be computed
    pub rhat: BTreeMap<String, f64>,
    /// Configuration the fit ran with
    pub config: SamplerConfig,
}

/// Lifecycle of a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState {
    /// Input assembled, not yet fit
    Built,
    /// Posterior available
    Fit(Box<FitResult>),
}

/// Input table plus, once fit, its posterior
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    rows: Vec<InputRow>,
    random_seed: u64,
    state: ModelState,
}

/// Assemble a model for one pathogen, taxid group and study
///
/// Every sample of `bioprojects` (filtered by `enrichment` when given) gets
/// one row with its read counts and the predictors that best match it.
/// Returns `Ok(None)` when no sample matches any predictor.
pub fn build_model<D: SequencingData + ?Sized>(
    dataset: &D,
    bioprojects: &[BioProject],
    predictors: &[Predictor],
    taxids: &TaxIds,
    random_seed: u64,
    enrichment: Option<Enrichment>,
) -> Result<Option<Model>> {
    let matcher = Matcher::default();
    let mut seen = BTreeSet::new();
    let mut rows = Vec::new();

    for bioproject in bioprojects {
        let attributes = dataset.sample_attributes(bioproject, enrichment)?;
        let total_reads = dataset.total_reads(bioproject)?;
        let viral_reads = dataset.viral_reads(bioproject, taxids)?;

        for (sample, attrs) in attributes {
            if !seen.insert(sample.clone()) {
                warn!("Sample {sample} appears in more than one bioproject; keeping the first");
                continue;
            }
            let total = total_reads.get(&sample).copied().ok_or_else(|| {
                Error::Dataset(format!("sample {sample} has no total read count"))
            })?;
            let viral = viral_reads.get(&sample).copied().unwrap_or(0);
            let matched = matcher
                .lookup_variables(&attrs, predictors)?
                .into_iter()
                .map(Predictor::get_data)
                .collect();

            rows.push(InputRow {
                sample,
                bioproject: bioproject.clone(),
                date: attrs.date,
                country: attrs.country,
                state: attrs.state,
                county: attrs.county,
                location: attrs.location,
                fine_location: attrs.fine_location,
                enrichment: attrs.enrichment,
                total_reads: total,
                viral_reads: viral,
                matched,
            });
        }
    }

    if rows.iter().all(|row| row.matched.is_empty()) {
        debug!(
            "No predictor matches any of {} samples in {}",
            rows.len(),
            bioprojects.iter().join(", ")
        );
        return Ok(None);
    }
    Ok(Some(Model::new(rows, random_seed)))
}

impl Model {
    /// Create an unfit model from assembled rows
    #[must_use]
    pub const fn new(rows: Vec<InputRow>, random_seed: u64) -> Self {
        Self {
            rows,
            random_seed,
            state: ModelState::Built,
        }
    }

    /// The input table, one row per sample
    #[must_use]
    pub fn input_rows(&self) -> &[InputRow] {
        &self.rows
    }

    /// Seed of the random stream
    #[must_use]
    pub const fn random_seed(&self) -> u64 {
        self.random_seed
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> &ModelState {
        &self.state
    }

    /// Whether the model has been fit
    #[must_use]
    pub const fn is_fit(&self) -> bool {
        matches!(self.state, ModelState::Fit(_))
    }

    /// Fit with default sampler settings
    pub fn fit_model(&mut self, num_samples: usize, num_chains: usize) -> Result<()> {
        let config = SamplerConfig::builder()
            .num_samples(num_samples)
            .num_chains(num_chains)
            .build();
        self.fit_with(&config)
    }

    /// Fit with explicit sampler settings
    ///
    /// Fails without changing state on a degenerate design, a non-finite
    /// posterior or chains that did not converge.
    pub fn fit_with(&mut self, config: &SamplerConfig) -> Result<()> {
        config.validate()?;

        let fitted: Vec<&InputRow> = self.rows.iter().filter(|r| r.is_fittable()).collect();
        if fitted.is_empty() {
            return Err(Error::DegenerateDesign(
                "no sample has both reads and a positive predictor".to_string(),
            ));
        }
        let locations: Vec<String> = fitted
            .iter()
            .map(|row| row.location.clone())
            .sorted()
            .dedup()
            .collect();
        let location_index: BTreeMap<&str, usize> = locations
            .iter()
            .enumerate()
            .map(|(i, location)| (location.as_str(), i))
            .collect();

        let observation_locations: Vec<usize> = fitted
            .iter()
            .map(|row| location_index[row.location.as_str()])
            .collect();
        let exposure: Vec<f64> = fitted
            .iter()
            .map(|row| {
                let predictor = row.predictor().unwrap_or_default();
                row.total_reads as f64 * predictor / REFERENCE_SCALE
            })
            .collect();
        let viral: Vec<u64> = fitted.iter().map(|row| row.viral_reads).collect();
        let target = Target::new(&viral, &exposure, &observation_locations, locations.len())?;

        info!(
            "Fitting {} samples across {} locations: {} chains of {} draws",
            fitted.len(),
            locations.len(),
            config.num_chains,
            config.num_samples
        );
        let chains: Vec<ChainDraws> = (0..config.num_chains)
            .map(|chain| {
                sampler::run_chain(&target, config, self.random_seed.wrapping_add(chain as u64))
            })
            .collect::<Result<_>>()?;

        let rhat = check_convergence(&chains, &locations, config.max_rhat)?;

        let mut coefficients = Vec::with_capacity(locations.len() + 1);
        for (l, location) in locations.iter().enumerate() {
            coefficients.push(coefficient(location, &chains, |d| log_theta(d, l).exp())?);
        }
        coefficients.push(coefficient(OVERALL, &chains, |d| d[sampler::B].exp())?);

        let mut output_by_sample = Vec::with_capacity(fitted.len());
        for (i, row) in fitted.iter().enumerate() {
            let l = observation_locations[i];
            let expected: Vec<f64> = chains
                .iter()
                .flatten()
                .map(|d| target.expected_reads(d, i, l))
                .collect();
            output_by_sample.push(SampleOutput {
                sample: row.sample.clone(),
                location: row.location.clone(),
                date: row.date,
                viral_reads: row.viral_reads,
                total_reads: row.total_reads,
                predictor: row.predictor().unwrap_or_default(),
                expected_reads: describe(&expected)?,
            });
        }

        self.state = ModelState::Fit(Box::new(FitResult {
            coefficients,
            output_by_sample,
            rhat,
            config: config.clone(),
        }));
        Ok(())
    }

    fn fit_result(&self) -> Result<&FitResult> {
        match &self.state {
            ModelState::Fit(result) => Ok(result),
            ModelState::Built => Err(Error::ModelNotFit),
        }
    }

    /// Posterior of `ra_at_1in100` per location, then [`OVERALL`]
    pub fn get_coefficients(&self) -> Result<&[Coefficient]> {
        Ok(&self.fit_result()?.coefficients)
    }

    /// Fitted values for every sample that entered the likelihood
    pub fn get_output_by_sample(&self) -> Result<&[SampleOutput]> {
        Ok(&self.fit_result()?.output_by_sample)
    }

    /// Split R-hat of the monitored parameters
    pub fn get_rhat(&self) -> Result<&BTreeMap<String, f64>> {
        Ok(&self.fit_result()?.rhat)
    }
}

fn describe(draws: &[f64]) -> Result<SummaryStats> {
    SummaryStats::describe(draws)
        .ok_or_else(|| Error::NonFinitePosterior("no posterior draws".to_string()))
}

fn coefficient(
    location: &str,
    chains: &[ChainDraws],
    transform: impl Fn(&[f64]) -> f64,
) -> Result<Coefficient> {
    let draws: Vec<f64> = chains
        .iter()
        .flatten()
        .map(|d| transform(d.as_slice()))
        .collect();
    if let Some(bad) = draws.iter().find(|v| !v.is_finite()) {
        return Err(Error::NonFinitePosterior(format!(
            "draw of {location} coefficient is {bad}"
        )));
    }
    Ok(Coefficient {
        location: location.to_string(),
        summary: describe(&draws)?,
        draws,
    })
}

/// Parameters whose mixing is checked after a fit
#[derive(Debug, Clone, Copy)]
enum Monitored {
    B,
    Sigma,
    Phi,
    Theta(usize),
}

impl Monitored {
    fn value(self, draw: &[f64]) -> f64 {
        match self {
            Self::B => draw[sampler::B],
            Self::Sigma => draw[LOG_SIGMA],
            Self::Phi => draw[LOG_PHI],
            Self::Theta(location) => log_theta(draw, location),
        }
    }
}

/// Split R-hat for b, sigma, phi and every location's log abundance
fn check_convergence(
    chains: &[ChainDraws],
    locations: &[String],
    max_rhat: f64,
) -> Result<BTreeMap<String, f64>> {
    let mut monitored = vec![
        ("b".to_string(), Monitored::B),
        ("sigma".to_string(), Monitored::Sigma),
        ("phi".to_string(), Monitored::Phi),
    ];
    for (l, location) in locations.iter().enumerate() {
        monitored.push((format!("theta[{location}]"), Monitored::Theta(l)));
    }

    let mut rhat = BTreeMap::new();
    for (name, parameter) in monitored {
        let traces: Vec<Vec<f64>> = chains
            .iter()
            .map(|chain| chain.iter().map(|d| parameter.value(d)).collect())
            .collect();
        if let Some(value) = diagnostics::split_rhat(&traces) {
            rhat.insert(name, value);
        }
    }

    if let Some((parameter, &value)) = rhat
        .iter()
        .filter(|(_, value)| !(**value <= max_rhat))
        .max_by(|a, b| a.1.total_cmp(b.1))
    {
        return Err(Error::NonConvergence {
            parameter: parameter.clone(),
            rhat: value,
        });
    }
    Ok(rhat)
}
