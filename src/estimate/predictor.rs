//! Predictors: the estimates a model is fit against

use std::fmt;

use super::types::{IncidenceRate, Prevalence};
use crate::pathogens::TaxId;
use crate::variable::Variable;

/// Number of weeks in a (non-leap) year
const WEEKS_PER_YEAR: f64 = 365.0 / 7.0;

/// Which kind of estimate a predictor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PredictorType {
    /// Point prevalence
    Prevalence,
    /// Incidence rate
    Incidence,
}

impl PredictorType {
    /// Label used in output tables
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prevalence => "prevalence",
            Self::Incidence => "incidence",
        }
    }
}

impl fmt::Display for PredictorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An estimate used to predict viral read counts
#[derive(Debug, Clone, PartialEq)]
pub enum Predictor {
    /// Prevalence predictor
    Prevalence(Prevalence),
    /// Incidence predictor
    Incidence(IncidenceRate),
}

impl Predictor {
    /// Kind of predictor
    #[must_use]
    pub const fn predictor_type(&self) -> PredictorType {
        match self {
            Self::Prevalence(_) => PredictorType::Prevalence,
            Self::Incidence(_) => PredictorType::Incidence,
        }
    }

    /// Predictor value per 100k people
    ///
    /// Prevalence is used as is. Incidence is expressed as weekly incidence,
    /// so that 1000 per 100k means 1 in 100 people infected over a week.
    #[must_use]
    pub fn get_data(&self) -> f64 {
        match self {
            Self::Prevalence(p) => p.infections_per_100k,
            Self::Incidence(i) => i.annual_infections_per_100k / WEEKS_PER_YEAR,
        }
    }

    /// Taxid override, if the estimate is narrower than its pathogen
    #[must_use]
    pub const fn taxid(&self) -> Option<TaxId> {
        match self {
            Self::Prevalence(p) => p.taxid,
            Self::Incidence(i) => i.taxid,
        }
    }
}

impl AsRef<Variable> for Predictor {
    fn as_ref(&self) -> &Variable {
        match self {
            Self::Prevalence(p) => &p.variable,
            Self::Incidence(i) => &i.variable,
        }
    }
}

impl From<Prevalence> for Predictor {
    fn from(prevalence: Prevalence) -> Self {
        Self::Prevalence(prevalence)
    }
}

impl From<IncidenceRate> for Predictor {
    fn from(incidence: IncidenceRate) -> Self {
        Self::Incidence(incidence)
    }
}
