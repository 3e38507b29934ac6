//! Calendar period utilities for measurement dates
//!
//! Literature values are dated at three granularities: a whole year
//! (`2019`), a month (`2019-05`) or a single day (`2019-05-14`). A period
//! expands to its first and last calendar day, inclusive.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::VariableError;

/// A calendar period parsed from a date string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePeriod {
    /// Whole year (e.g., 2020)
    Year(i32),
    /// Whole month (e.g., 2020-02)
    Month(i32, u32), // year, month
    /// Single day (e.g., 2020-02-01)
    Day(NaiveDate),
}

impl DatePeriod {
    /// Get the first day of this period
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Year(year) => first_of_month(*year, 1),
            Self::Month(year, month) => first_of_month(*year, *month),
            Self::Day(date) => *date,
        }
    }

    /// Get the last day of this period (inclusive)
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::Year(year) => last_of_month(*year, 12),
            Self::Month(year, month) => last_of_month(*year, *month),
            Self::Day(date) => *date,
        }
    }

    /// Check if this period contains the given date
    #[must_use]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        &self.start_date() <= date && date <= &self.end_date()
    }
}

impl fmt::Display for DatePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Month(year, month) => write!(f, "{year}-{month:02}"),
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for DatePeriod {
    type Err = VariableError;

    /// Parse a string into a `DatePeriod`
    ///
    /// Supported formats:
    /// - "2020" - Year
    /// - "2020-01" - Year and month (YYYY-MM)
    /// - "2020-01-31" - Full date (YYYY-MM-DD)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref YEAR_PATTERN: Regex = Regex::new(r"^(\d{4})$").unwrap();
            static ref MONTH_PATTERN: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
            static ref DAY_PATTERN: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
        }

        let invalid = || VariableError::InvalidDateFormat(s.to_string());
        let number = |text: &str| text.parse::<u32>().map_err(|_| invalid());

        if let Some(caps) = YEAR_PATTERN.captures(s) {
            let year = number(&caps[1])?;
            Ok(Self::Year(year as i32))
        } else if let Some(caps) = MONTH_PATTERN.captures(s) {
            let year = number(&caps[1])? as i32;
            let month = number(&caps[2])?;
            if !(1..=12).contains(&month) {
                return Err(invalid());
            }
            Ok(Self::Month(year, month))
        } else if let Some(caps) = DAY_PATTERN.captures(s) {
            let year = number(&caps[1])? as i32;
            let month = number(&caps[2])?;
            let day = number(&caps[3])?;
            NaiveDate::from_ymd_opt(year, month, day)
                .map(Self::Day)
                .ok_or_else(invalid)
        } else {
            Err(invalid())
        }
    }
}

/// Number of days in a calendar month, respecting leap years
///
/// Returns 0 for a month outside 1..=12.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    last_of_month(year, month).day()
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
