//! Estimate subtypes
//!
//! Each estimate wraps a [`Variable`] with a value in its own unit.

use crate::pathogens::TaxId;
use crate::variable::Variable;

/// Whether a prevalence counts active infections or latent carriage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Active {
    /// Currently shedding
    Active,
    /// Carried but not necessarily shedding (e.g. seroprevalence)
    Latent,
}

/// Infections per 100k people at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Prevalence {
    /// Infections per 100k people
    pub infections_per_100k: f64,
    /// Activity state
    pub active: Active,
    /// Study size, when the value comes straight from a survey
    pub number_of_participants: Option<u32>,
    /// Taxid this estimate is restricted to, if narrower than the pathogen
    pub taxid: Option<TaxId>,
    /// Applicability and provenance
    pub variable: Variable,
}

impl Prevalence {
    /// Create a new prevalence estimate
    #[must_use]
    pub const fn new(infections_per_100k: f64, active: Active, variable: Variable) -> Self {
        Self {
            infections_per_100k,
            active,
            number_of_participants: None,
            taxid: None,
            variable,
        }
    }

    /// Record the survey size
    #[must_use]
    pub const fn with_participants(mut self, participants: u32) -> Self {
        self.number_of_participants = Some(participants);
        self
    }

    /// Restrict the estimate to one taxid
    #[must_use]
    pub const fn with_taxid(mut self, taxid: TaxId) -> Self {
        self.taxid = Some(taxid);
        self
    }
}

/// Annual number of infections in a population
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceAbsolute {
    /// Infections per year
    pub annual_infections: f64,
    /// Lower and upper bound of the reported interval
    pub confidence_interval: Option<(f64, f64)>,
    /// Coverage probability of the interval (e.g. 0.9)
    pub coverage_probability: Option<f64>,
    /// Taxid this estimate is restricted to
    pub taxid: Option<TaxId>,
    /// Applicability and provenance
    pub variable: Variable,
}

impl IncidenceAbsolute {
    /// Create a new absolute incidence estimate
    #[must_use]
    pub const fn new(annual_infections: f64, variable: Variable) -> Self {
        Self {
            annual_infections,
            confidence_interval: None,
            coverage_probability: None,
            taxid: None,
            variable,
        }
    }

    /// Attach a reported interval
    #[must_use]
    pub const fn with_interval(mut self, low: f64, high: f64, coverage: f64) -> Self {
        self.confidence_interval = Some((low, high));
        self.coverage_probability = Some(coverage);
        self
    }
}

/// Annual infections per 100k people
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceRate {
    /// Infections per 100k people per year
    pub annual_infections_per_100k: f64,
    /// Taxid this estimate is restricted to
    pub taxid: Option<TaxId>,
    /// Applicability and provenance
    pub variable: Variable,
}

impl IncidenceRate {
    /// Create a new incidence rate estimate
    #[must_use]
    pub const fn new(annual_infections_per_100k: f64, variable: Variable) -> Self {
        Self {
            annual_infections_per_100k,
            taxid: None,
            variable,
        }
    }

    /// Restrict the estimate to one taxid
    #[must_use]
    pub const fn with_taxid(mut self, taxid: TaxId) -> Self {
        self.taxid = Some(taxid);
        self
    }
}

/// Head count
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Number of people
    pub people: f64,
    /// Applicability and provenance
    pub variable: Variable,
}

impl Population {
    /// Create a new population estimate
    #[must_use]
    pub const fn new(people: f64, variable: Variable) -> Self {
        Self { people, variable }
    }
}

/// Dimensionless multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// Multiplier
    pub scalar: f64,
    /// Applicability and provenance
    pub variable: Variable,
}

impl Scalar {
    /// Create a new scalar
    #[must_use]
    pub const fn new(scalar: f64, variable: Variable) -> Self {
        Self { scalar, variable }
    }
}

/// How long an infected person sheds
#[derive(Debug, Clone, PartialEq)]
pub struct SheddingDuration {
    /// Days of shedding
    pub days: f64,
    /// Lower and upper bound in days
    pub confidence_interval: Option<(f64, f64)>,
    /// Applicability and provenance
    pub variable: Variable,
}

impl SheddingDuration {
    /// Create a new shedding duration
    #[must_use]
    pub const fn new(days: f64, variable: Variable) -> Self {
        Self {
            days,
            confidence_interval: None,
            variable,
        }
    }

    /// Attach a reported range in days
    #[must_use]
    pub const fn with_interval(mut self, low: f64, high: f64) -> Self {
        self.confidence_interval = Some((low, high));
        self
    }
}

macro_rules! impl_as_variable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsRef<Variable> for $ty {
                fn as_ref(&self) -> &Variable {
                    &self.variable
                }
            }
        )*
    };
}

impl_as_variable!(
    Prevalence,
    IncidenceAbsolute,
    IncidenceRate,
    Population,
    Scalar,
    SheddingDuration,
);
