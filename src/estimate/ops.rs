//! Arithmetic and unit conversions between estimates

use std::ops::{Add, Mul};

use super::Estimate;
use super::types::{
    Active, IncidenceAbsolute, IncidenceRate, Population, Prevalence, Scalar, SheddingDuration,
};
use crate::error::VariableError;
use crate::variable::Variable;

const PER_100K: f64 = 100_000.0;
const DAYS_PER_YEAR: f64 = 365.0;

macro_rules! impl_scale_by_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Mul<&Scalar> for &$ty {
                type Output = Result<$ty, VariableError>;

                fn mul(self, rhs: &Scalar) -> Self::Output {
                    let variable = Variable::combine(&self.variable, &rhs.variable)?;
                    Ok(self.scale(rhs.scalar, variable))
                }
            }

            impl Mul<&Scalar> for $ty {
                type Output = Result<$ty, VariableError>;

                fn mul(self, rhs: &Scalar) -> Self::Output {
                    &self * rhs
                }
            }
        )*
    };
}

macro_rules! impl_sum {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Add<&$ty> for &$ty {
                type Output = Result<$ty, VariableError>;

                fn add(self, rhs: &$ty) -> Self::Output {
                    self.compatible(rhs)?;
                    let variable = Variable::combine(&self.variable, &rhs.variable)?;
                    Ok(self.derive(self.value() + rhs.value(), variable))
                }
            }

            impl Add<&$ty> for $ty {
                type Output = Result<$ty, VariableError>;

                fn add(self, rhs: &$ty) -> Self::Output {
                    &self + rhs
                }
            }
        )*
    };
}

impl_scale_by_scalar!(Prevalence, IncidenceAbsolute, IncidenceRate, Scalar);
impl_sum!(Prevalence, IncidenceRate);

fn require_positive(what: &str, value: f64) -> Result<(), VariableError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(VariableError::IncompatibleEstimates(format!(
            "{what} must be positive and finite, got {value}"
        )))
    }
}

impl IncidenceAbsolute {
    /// Convert an annual case count to a rate per 100k people
    pub fn to_rate(&self, population: &Population) -> Result<IncidenceRate, VariableError> {
        require_positive("population", population.people)?;
        let variable = Variable::combine(&self.variable, &population.variable)?;
        Ok(IncidenceRate {
            annual_infections_per_100k: self.annual_infections / population.people * PER_100K,
            taxid: self.taxid,
            variable,
        })
    }
}

impl IncidenceRate {
    /// Convert an annual rate to point prevalence given how long people shed
    pub fn to_prevalence(&self, shedding: &SheddingDuration) -> Result<Prevalence, VariableError> {
        require_positive("shedding duration", shedding.days)?;
        let variable = Variable::combine(&self.variable, &shedding.variable)?;
        Ok(Prevalence {
            infections_per_100k: self.annual_infections_per_100k * shedding.days / DAYS_PER_YEAR,
            active: Active::Active,
            number_of_participants: None,
            taxid: self.taxid,
            variable,
        })
    }
}

impl Prevalence {
    /// Convert point prevalence to an annual rate given how long people shed
    pub fn to_incidence(&self, shedding: &SheddingDuration) -> Result<IncidenceRate, VariableError> {
        require_positive("shedding duration", shedding.days)?;
        let variable = Variable::combine(&self.variable, &shedding.variable)?;
        Ok(IncidenceRate {
            annual_infections_per_100k: self.infections_per_100k * DAYS_PER_YEAR / shedding.days,
            taxid: self.taxid,
            variable,
        })
    }
}
