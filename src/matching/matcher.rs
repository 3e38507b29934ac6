//! Core matching implementation
//!
//! This module implements the `Matcher` which scores estimates against one
//! sample and selects the best applicable ones.

use chrono::NaiveDate;
use log::trace;

use super::criteria::MatchingCriteria;
use crate::error::VariableError;
use crate::mgs::SampleAttributes;
use crate::variable::Variable;

/// Score of an applicable estimate; higher is better
pub type MatchScore = i64;

/// Matcher for pairing estimates with samples
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    /// Scoring criteria
    criteria: MatchingCriteria,
}

impl Matcher {
    /// Create a new matcher with the given criteria
    #[must_use]
    pub const fn new(criteria: MatchingCriteria) -> Self {
        Self { criteria }
    }

    /// Scoring criteria in use
    #[must_use]
    pub const fn criteria(&self) -> &MatchingCriteria {
        &self.criteria
    }

    /// Score how well `candidate` applies to the sample
    ///
    /// Returns `Ok(None)` when the candidate names a different place than the
    /// sample, or when its dates are further from the sample date than the
    /// tolerance allows. Fails if the candidate was never dated.
    pub fn match_quality<T: AsRef<Variable>>(
        &self,
        attrs: &SampleAttributes,
        candidate: &T,
    ) -> Result<Option<MatchScore>, VariableError> {
        let variable = candidate.as_ref();
        let location = variable.location();

        // Every field the candidate specifies must equal the sample's
        if let Some(country) = location.country_name() {
            if country != attrs.country {
                return Ok(None);
            }
        }
        let mut score = 0;
        if let Some(state) = location.state_name() {
            if attrs.state.as_deref() != Some(state) {
                return Ok(None);
            }
            score += self.criteria.state_bonus;
        }
        if let Some(county) = location.county_name() {
            if attrs.county.as_deref() != Some(county) {
                return Ok(None);
            }
            score += self.criteria.county_bonus;
        }

        let (start, end) = variable.get_dates()?;
        let distance = days_outside(attrs.date, start, end);
        if !self.criteria.is_within_tolerance(distance) {
            trace!(
                "Rejecting estimate dated {} for sample on {}: {distance} days off",
                variable.summarize_date(),
                attrs.date
            );
            return Ok(None);
        }

        Ok(Some(score - distance))
    }

    /// Select every candidate tied for the best score
    ///
    /// Candidates that do not match are discarded; ties are all kept, in
    /// input order. Returns an empty list when nothing matches.
    pub fn lookup_variables<'a, T: AsRef<Variable>>(
        &self,
        attrs: &SampleAttributes,
        candidates: &'a [T],
    ) -> Result<Vec<&'a T>, VariableError> {
        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(score) = self.match_quality(attrs, candidate)? {
                scored.push((score, candidate));
            }
        }

        let Some(best) = scored.iter().map(|(score, _)| *score).max() else {
            return Ok(Vec::new());
        };
        Ok(scored
            .into_iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, candidate)| candidate)
            .collect())
    }
}

/// Days between `date` and the nearest edge of `[start, end]`; 0 inside
fn days_outside(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> i64 {
    if date < start {
        (start - date).num_days()
    } else if date > end {
        (date - end).num_days()
    } else {
        0
    }
}

/// Score a candidate with the default criteria
pub fn match_quality<T: AsRef<Variable>>(
    attrs: &SampleAttributes,
    candidate: &T,
) -> Result<Option<MatchScore>, VariableError> {
    Matcher::default().match_quality(attrs, candidate)
}

/// Select the best candidates with the default criteria
pub fn lookup_variables<'a, T: AsRef<Variable>>(
    attrs: &SampleAttributes,
    candidates: &'a [T],
) -> Result<Vec<&'a T>, VariableError> {
    Matcher::default().lookup_variables(attrs, candidates)
}
