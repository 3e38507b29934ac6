//! Literature estimates and their combination algebra
//!
//! Estimates are typed wrappers over [`Variable`]: a prevalence, an incidence,
//! a population and so on. Combining two estimates (multiplication by a
//! scalar, addition, unit conversion) produces a new estimate whose variable
//! lists both operands as inputs, so every derived number keeps an auditable
//! trail back to its sources. Because combining can surface a location
//! conflict, every combination returns a `Result`.

pub mod ops;
pub mod predictor;
pub mod types;

pub use predictor::{Predictor, PredictorType};
pub use types::{
    Active, IncidenceAbsolute, IncidenceRate, Population, Prevalence, Scalar, SheddingDuration,
};

use crate::error::VariableError;
use crate::variable::{Variable, VariableBuilder};

/// Shared behaviour of every estimate subtype
pub trait Estimate: AsRef<Variable> + Clone + Sized {
    /// Numeric value in the subtype's unit
    fn value(&self) -> f64;

    /// Copy of this estimate carrying a new value and variable
    fn derive(&self, value: f64, variable: Variable) -> Self;

    /// Check that two estimates can be combined into one
    fn compatible(&self, _other: &Self) -> Result<(), VariableError> {
        Ok(())
    }

    /// Copy of this estimate multiplied by `factor`
    fn scale(&self, factor: f64, variable: Variable) -> Self {
        self.derive(self.value() * factor, variable)
    }

    /// Same value applied to a different place or time
    ///
    /// The builder supplies the overriding location/date; this estimate
    /// becomes the sole input of the new value, so the extrapolation stays
    /// visible in the provenance.
    fn target(&self, builder: VariableBuilder) -> Result<Self, VariableError> {
        let variable = builder.input(self.as_ref().clone()).build()?;
        Ok(self.derive(self.value(), variable))
    }

    /// Population-weighted mean of several estimates
    ///
    /// Returns `Σ(value_i × people_i) / Σ(people_i)`.
    fn weighted_average_by_population(
        pairs: &[(Self, Population)],
    ) -> Result<Self, VariableError> {
        let Some((first, _)) = pairs.first() else {
            return Err(VariableError::EmptyAggregate);
        };

        let mut weighted_sum = 0.0;
        let mut total_people = 0.0;
        for (estimate, population) in pairs {
            first.compatible(estimate)?;
            weighted_sum += estimate.value() * population.people;
            total_people += population.people;
        }
        if total_people <= 0.0 {
            return Err(VariableError::IncompatibleEstimates(
                "total population must be positive".to_string(),
            ));
        }

        let variable = Variable::builder()
            .inputs(pairs.iter().flat_map(|(estimate, population)| {
                [estimate.as_ref().clone(), population.variable.clone()]
            }))
            .build()?;
        Ok(first.derive(weighted_sum / total_people, variable))
    }
}

impl Estimate for Prevalence {
    fn value(&self) -> f64 {
        self.infections_per_100k
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self {
            infections_per_100k: value,
            number_of_participants: None,
            variable,
            ..self.clone()
        }
    }

    fn compatible(&self, other: &Self) -> Result<(), VariableError> {
        if self.active != other.active {
            return Err(VariableError::IncompatibleEstimates(format!(
                "cannot combine {:?} and {:?} prevalences",
                self.active, other.active
            )));
        }
        if self.taxid != other.taxid {
            return Err(VariableError::IncompatibleEstimates(
                "prevalences are restricted to different taxids".to_string(),
            ));
        }
        Ok(())
    }
}

impl Estimate for IncidenceAbsolute {
    fn value(&self) -> f64 {
        self.annual_infections
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self {
            annual_infections: value,
            variable,
            ..self.clone()
        }
    }

    fn scale(&self, factor: f64, variable: Variable) -> Self {
        Self {
            annual_infections: self.annual_infections * factor,
            confidence_interval: self
                .confidence_interval
                .map(|(low, high)| (low * factor, high * factor)),
            variable,
            ..self.clone()
        }
    }
}

impl Estimate for IncidenceRate {
    fn value(&self) -> f64 {
        self.annual_infections_per_100k
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self {
            annual_infections_per_100k: value,
            variable,
            ..self.clone()
        }
    }

    fn compatible(&self, other: &Self) -> Result<(), VariableError> {
        if self.taxid == other.taxid {
            Ok(())
        } else {
            Err(VariableError::IncompatibleEstimates(
                "incidences are restricted to different taxids".to_string(),
            ))
        }
    }
}

impl Estimate for Population {
    fn value(&self) -> f64 {
        self.people
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self::new(value, variable)
    }
}

impl Estimate for Scalar {
    fn value(&self) -> f64 {
        self.scalar
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self::new(value, variable)
    }
}

impl Estimate for SheddingDuration {
    fn value(&self) -> f64 {
        self.days
    }

    fn derive(&self, value: f64, variable: Variable) -> Self {
        Self {
            days: value,
            variable,
            ..self.clone()
        }
    }
}
