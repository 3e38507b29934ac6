//! Hierarchical spatial applicability of a measurement
//!
//! A location is an ordered specificity chain: a county is only meaningful
//! inside a state, and a state inside a country. Encoding the chain as an
//! enum makes a county without a state unrepresentable.

use std::fmt;

use crate::error::VariableError;

/// Spatial applicability, from unspecified to county level
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    /// No location information
    #[default]
    Unspecified,
    /// Whole country
    Country {
        /// Country name
        country: String,
    },
    /// A state within a country
    State {
        /// Country name
        country: String,
        /// State name
        state: String,
    },
    /// A county within a state
    County {
        /// Country name
        country: String,
        /// State name
        state: String,
        /// County name
        county: String,
    },
}

impl Location {
    /// Build a location from optional fields, enforcing the hierarchy
    pub fn from_fields(
        country: Option<String>,
        state: Option<String>,
        county: Option<String>,
    ) -> Result<Self, VariableError> {
        match (country, state, county) {
            (None, None, None) => Ok(Self::Unspecified),
            (Some(country), None, None) => Ok(Self::Country { country }),
            (Some(country), Some(state), None) => Ok(Self::State { country, state }),
            (Some(country), Some(state), Some(county)) => Ok(Self::County {
                country,
                state,
                county,
            }),
            (None, Some(state), _) => Err(VariableError::BrokenLocationHierarchy(format!(
                "state {state} set without a country"
            ))),
            (_, None, Some(county)) => Err(VariableError::BrokenLocationHierarchy(format!(
                "county {county} set without a state"
            ))),
        }
    }

    /// Country-level location
    #[must_use]
    pub fn country(name: impl Into<String>) -> Self {
        Self::Country {
            country: name.into(),
        }
    }

    /// Whether no field is set
    #[must_use]
    pub const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    /// Country name, if set
    #[must_use]
    pub fn country_name(&self) -> Option<&str> {
        match self {
            Self::Unspecified => None,
            Self::Country { country }
            | Self::State { country, .. }
            | Self::County { country, .. } => Some(country),
        }
    }

    /// State name, if set
    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        match self {
            Self::State { state, .. } | Self::County { state, .. } => Some(state),
            _ => None,
        }
    }

    /// County name, if set
    #[must_use]
    pub fn county_name(&self) -> Option<&str> {
        match self {
            Self::County { county, .. } => Some(county),
            _ => None,
        }
    }

    /// Number of levels set (0 = unspecified, 3 = county)
    #[must_use]
    pub const fn specificity(&self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Country { .. } => 1,
            Self::State { .. } => 2,
            Self::County { .. } => 3,
        }
    }

    /// Render the most specific field first, e.g. "Ohio, United States"
    #[must_use]
    pub fn summarize(&self) -> String {
        let parts: Vec<&str> = [self.county_name(), self.state_name(), self.country_name()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            "Unspecified".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summarize())
    }
}
