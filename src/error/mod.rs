//! Error handling for the p2ra pipeline.
//!
//! Construction and precondition failures of measurement values are reported
//! through [`VariableError`] so callers can branch on the exact cause. Every
//! other failure surfaces as [`Error`], which wraps `VariableError` and adds
//! dataset, registry, model-state and fitting failures.

pub mod util;

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;

/// Errors raised while constructing or querying a measurement value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VariableError {
    /// A point date was combined with a start/end pair
    #[error("Conflicting dates: a point date cannot be combined with a start/end range")]
    ConflictingDates,

    /// Only one side of a start/end pair was given
    #[error("Incomplete date range: both start and end dates are required")]
    IncompleteDateRange,

    /// A date string did not match `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// The end of a range precedes its start
    #[error("Inverted date range: end {end} is before start {start}")]
    InvertedRange {
        /// Resolved start date
        start: NaiveDate,
        /// Resolved end date
        end: NaiveDate,
    },

    /// Combined inputs disagree on location and no source was designated
    #[error("Conflicting locations among inputs ({0} vs {1}) and no location source designated")]
    ConflictingLocation(String, String),

    /// A location field was set without its parent field
    #[error("Broken location hierarchy: {0}")]
    BrokenLocationHierarchy(String),

    /// Dates were requested but never set
    #[error("No date information has been set")]
    DatesUnset,

    /// A single date was requested from a multi-day range
    #[error("Expected a single date but found range {start} to {end}")]
    NotSingleDate {
        /// Resolved start date
        start: NaiveDate,
        /// Resolved end date
        end: NaiveDate,
    },

    /// A location was requested but never set
    #[error("No location information has been set")]
    LocationUnset,

    /// Two estimates cannot be combined
    #[error("Incompatible estimates: {0}")]
    IncompatibleEstimates(String),

    /// An aggregate was requested over no inputs
    #[error("Cannot aggregate an empty set of estimates")]
    EmptyAggregate,
}

/// Specialized error type for the p2ra pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Measurement value construction or precondition failure
    #[error(transparent)]
    Variable(#[from] VariableError),

    /// Error opening or reading a file
    #[error("IO error at {path}: {source}")]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error decoding a JSON snapshot file
    #[error("JSON error in {path}: {source}")]
    Json {
        /// File that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Error reading or writing a tab-separated table
    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),

    /// Error with sequencing dataset contents
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// The requested bioproject is not part of the dataset
    #[error("Unknown bioproject: {0}")]
    UnknownBioproject(String),

    /// The requested pathogen is not registered
    #[error("Unknown pathogen: {0}")]
    UnknownPathogen(String),

    /// No census population for the requested place and year
    #[error("No population for {place} in {year}")]
    MissingPopulation {
        /// Rendered location
        place: String,
        /// Requested year
        year: i32,
    },

    /// Catalog data violates an invariant
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Posterior accessors were called before fitting
    #[error("Model has not been fit; call fit_model first")]
    ModelNotFit,

    /// The input table cannot identify the model
    #[error("Degenerate design: {0}")]
    DegenerateDesign(String),

    /// Chains did not mix
    #[error("Sampler did not converge: R-hat for {parameter} is {rhat:.3}")]
    NonConvergence {
        /// Parameter with the worst mixing
        parameter: String,
        /// Split R-hat value
        rhat: f64,
    },

    /// The log posterior could not be evaluated
    #[error("Non-finite log posterior: {0}")]
    NonFinitePosterior(String),

    /// Invalid sampler or pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an IO error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON error with the path that caused it
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for p2ra operations
pub type Result<T> = std::result::Result<T, Error>;
