//! Estimate-to-sample matching
//!
//! This module decides which literature estimates apply to a sequencing
//! sample. It includes:
//!
//! 1. Matching criteria definition (bonuses and date tolerance)
//! 2. Scoring of a single estimate against a sample
//! 3. Selection of every estimate tied for the best score
//!
//! Location is a hard filter: an estimate naming a different country, state
//! or county never applies. Among applicable estimates, more specific
//! locations and closer dates win.

pub mod criteria;
pub mod matcher;

// Re-export key types
pub use criteria::{MatchingCriteria, MatchingCriteriaBuilder};
pub use matcher::{MatchScore, Matcher, lookup_variables, match_quality};
