//! Relate pathogen prevalence and incidence to relative abundance in
//! metagenomic sequencing data.
//!
//! Literature estimates are modelled as [`Variable`]s that know where and when
//! they apply. The [`matching`] engine pairs them with sequencing samples, and
//! [`model`] fits how read counts scale with the matched predictor.

pub mod config;
pub mod error;
pub mod estimate;
pub mod matching;
pub mod mgs;
pub mod model;
pub mod output;
pub mod pathogens;
pub mod pipeline;
pub mod populations;
pub mod utils;
pub mod variable;

// Core types
pub use config::{FitMode, PipelineConfig};
pub use error::{Error, Result, VariableError};
pub use variable::{Location, Variable, VariableBuilder};

// Estimates and predictors
pub use estimate::{
    Estimate, IncidenceAbsolute, IncidenceRate, Population, Predictor, PredictorType,
    Prevalence, Scalar, SheddingDuration,
};

// Matching and modelling
pub use matching::{MatchingCriteria, lookup_variables, match_quality};
pub use mgs::{BioProject, Enrichment, MgsData, Sample, SampleAttributes, SequencingData};
pub use model::{Model, SamplerConfig, build_model};
pub use pathogens::{Pathogen, PathogenDefinition, PathogenRegistry, TaxId, TaxIds};
