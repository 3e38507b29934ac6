//! Sequencing dataset access
//!
//! The matching and modelling code only ever asks three questions of a
//! sequencing dataset: which samples a bioproject has (with their
//! attributes), how many reads each sample has in total, and how many of
//! those reads were assigned to a set of taxids. [`SequencingData`] captures
//! exactly that; [`MgsData`] answers it from a local JSON snapshot.

pub mod snapshot;

pub use snapshot::MgsData;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pathogens::TaxIds;

/// Sequencing run accession
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(pub String);

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sample {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Bioproject accession
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BioProject(pub String);

impl fmt::Display for BioProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BioProject {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Sample preparation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enrichment {
    /// Viral enrichment before sequencing
    Viral,
    /// Targeted capture panel
    Panel,
    /// Plain shotgun sequencing
    Unenriched,
}

/// What is known about one sequencing sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleAttributes {
    /// Country the sample was collected in
    pub country: String,
    /// State, where applicable
    #[serde(default)]
    pub state: Option<String>,
    /// County, where applicable
    #[serde(default)]
    pub county: Option<String>,
    /// Collection date
    pub date: NaiveDate,
    /// Raw read count reported with the sample metadata
    pub reads: u64,
    /// Free-form grouping name, usually a treatment plant
    pub location: String,
    /// Sub-location within `location`, when the study reports one
    #[serde(default)]
    pub fine_location: Option<String>,
    /// Preparation category; `None` when the study does not say
    #[serde(default)]
    pub enrichment: Option<Enrichment>,
    /// Sample processing method label
    #[serde(default)]
    pub method: Option<String>,
}

/// Read-only sequencing dataset
pub trait SequencingData: Sync {
    /// Attributes of every sample in a bioproject
    ///
    /// With an `enrichment`, only samples of that category are returned.
    fn sample_attributes(
        &self,
        bioproject: &BioProject,
        enrichment: Option<Enrichment>,
    ) -> Result<BTreeMap<Sample, SampleAttributes>>;

    /// Total read count of every sample in a bioproject
    fn total_reads(&self, bioproject: &BioProject) -> Result<BTreeMap<Sample, u64>>;

    /// Reads assigned to any of `taxids`, for every sample in a bioproject
    ///
    /// Samples with no assigned reads are present with a count of zero.
    fn viral_reads(
        &self,
        bioproject: &BioProject,
        taxids: &TaxIds,
    ) -> Result<BTreeMap<Sample, u64>>;
}

/// The studies fit by the pipeline and their bioprojects, in fitting order
#[must_use]
pub fn target_bioprojects() -> Vec<(&'static str, Vec<BioProject>)> {
    vec![
        ("rothman", vec![BioProject::from("PRJNA729801")]),
        ("crits_christoph", vec![BioProject::from("PRJNA661613")]),
        ("spurbeck", vec![BioProject::from("PRJNA924011")]),
        (
            "brinch",
            vec![
                BioProject::from("PRJEB13832"),
                BioProject::from("PRJEB34633"),
            ],
        ),
    ]
}
