//! Matching criteria definitions for pairing estimates with samples
//!
//! This module provides the scoring constants used when deciding how well a
//! literature estimate applies to a sequencing sample.

/// Criteria for scoring an estimate against a sample
///
/// Location specificity earns a bonus; distance in days between the sample
/// date and the estimate's date range earns a penalty, up to a tolerance
/// beyond which the estimate does not apply at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingCriteria {
    /// Maximum allowed distance in days between the sample date and the estimate's range
    pub date_tolerance_days: i64,

    /// Bonus for an estimate that names the sample's state
    pub state_bonus: i64,

    /// Additional bonus for an estimate that also names the sample's county
    pub county_bonus: i64,
}

impl Default for MatchingCriteria {
    fn default() -> Self {
        Self {
            date_tolerance_days: 7, // Accept estimates up to a week off
            state_bonus: 10,
            county_bonus: 20,
        }
    }
}

impl MatchingCriteria {
    /// Create a new instance with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing matching criteria
    #[must_use]
    pub fn builder() -> MatchingCriteriaBuilder {
        MatchingCriteriaBuilder::new()
    }

    /// Check if a day distance falls within the tolerance window
    #[must_use]
    pub const fn is_within_tolerance(&self, distance_days: i64) -> bool {
        distance_days <= self.date_tolerance_days
    }

    /// Convert to a human-readable string representation
    #[must_use]
    pub fn to_string_representation(&self) -> String {
        format!(
            "Matching Criteria:\n\
             - Date tolerance: ±{} days\n\
             - State bonus: +{}\n\
             - County bonus: +{}",
            self.date_tolerance_days, self.state_bonus, self.county_bonus
        )
    }
}

/// Builder for constructing matching criteria
#[derive(Debug, Clone, Default)]
pub struct MatchingCriteriaBuilder {
    criteria: MatchingCriteria,
}

impl MatchingCriteriaBuilder {
    /// Create a new builder with default criteria
    #[must_use]
    pub fn new() -> Self {
        Self {
            criteria: MatchingCriteria::default(),
        }
    }

    /// Set the date tolerance in days
    #[must_use]
    pub const fn date_tolerance_days(mut self, days: i64) -> Self {
        self.criteria.date_tolerance_days = days;
        self
    }

    /// Set the state bonus
    #[must_use]
    pub const fn state_bonus(mut self, bonus: i64) -> Self {
        self.criteria.state_bonus = bonus;
        self
    }

    /// Set the county bonus
    #[must_use]
    pub const fn county_bonus(mut self, bonus: i64) -> Self {
        self.criteria.county_bonus = bonus;
        self
    }

    /// Build the matching criteria
    #[must_use]
    pub const fn build(self) -> MatchingCriteria {
        self.criteria
    }
}
