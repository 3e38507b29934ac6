//! Provenance-carrying measurement values
//!
//! A [`Variable`] records where and when a literature value applies and, for
//! derived values, which inputs it was computed from. Temporal and spatial
//! applicability are resolved once, when the value is built:
//!
//! - dates: a designated `date_source` wins, then directly given dates, then
//!   the union span of every input that carries dates
//! - location: a designated `location_source` wins, then directly given
//!   fields, then the location shared by every input that carries one
//!
//! Inputs that disagree on location without a designated source are a
//! construction error, never a silent pick.

pub mod location;
pub mod period;

pub use location::Location;
pub use period::{DatePeriod, days_in_month};

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::VariableError;

/// Inclusive date range a value applies to
pub type DateRange = (NaiveDate, NaiveDate);

/// A measurement's applicability and provenance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variable {
    /// Citation for the value
    pub source: Option<String>,
    /// Free-form label distinguishing related values (e.g. an age band)
    pub tag: Option<String>,
    dates: Option<DateRange>,
    location: Location,
    inputs: Vec<Arc<Variable>>,
    date_source: Option<Arc<Variable>>,
    location_source: Option<Arc<Variable>>,
}

impl Variable {
    /// Create a new builder for constructing a variable
    #[must_use]
    pub fn builder() -> VariableBuilder {
        VariableBuilder::new()
    }

    /// Derive a value from two operands, inheriting their applicability
    pub fn combine(lhs: &Self, rhs: &Self) -> Result<Self, VariableError> {
        Self::builder()
            .input(lhs.clone())
            .input(rhs.clone())
            .build()
    }

    /// Resolved (start, end) dates
    pub fn get_dates(&self) -> Result<DateRange, VariableError> {
        self.dates.ok_or(VariableError::DatesUnset)
    }

    /// Resolved single date; fails unless start == end
    pub fn get_date(&self) -> Result<NaiveDate, VariableError> {
        let (start, end) = self.get_dates()?;
        if start == end {
            Ok(start)
        } else {
            Err(VariableError::NotSingleDate { start, end })
        }
    }

    /// Resolved location; fails if no location was ever set
    pub fn get_location(&self) -> Result<&Location, VariableError> {
        if self.location.is_unspecified() {
            Err(VariableError::LocationUnset)
        } else {
            Ok(&self.location)
        }
    }

    /// Resolved dates, if any
    #[must_use]
    pub const fn dates(&self) -> Option<DateRange> {
        self.dates
    }

    /// Resolved location, possibly `Location::Unspecified`
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Inputs this value was derived from
    #[must_use]
    pub fn inputs(&self) -> &[Arc<Self>] {
        &self.inputs
    }

    /// Value designated to supply the dates, if any
    #[must_use]
    pub fn date_source(&self) -> Option<&Self> {
        self.date_source.as_deref()
    }

    /// Value designated to supply the location, if any
    #[must_use]
    pub fn location_source(&self) -> Option<&Self> {
        self.location_source.as_deref()
    }

    /// Human-readable location
    #[must_use]
    pub fn summarize_location(&self) -> String {
        self.location.summarize()
    }

    /// Human-readable date or date range
    #[must_use]
    pub fn summarize_date(&self) -> String {
        match self.dates {
            None => "Unspecified".to_string(),
            Some((start, end)) if start == end => start.to_string(),
            Some((start, end)) => format!("{start} to {end}"),
        }
    }

    /// Every source cited anywhere in this value's provenance
    #[must_use]
    pub fn all_sources(&self) -> Vec<&str> {
        let mut sources = Vec::new();
        self.collect_sources(&mut sources);
        sources.sort_unstable();
        sources.dedup();
        sources
    }

    fn collect_sources<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(source) = &self.source {
            out.push(source);
        }
        for input in &self.inputs {
            input.collect_sources(out);
        }
    }
}

impl AsRef<Self> for Variable {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Builder for constructing a [`Variable`]
#[derive(Debug, Clone, Default)]
pub struct VariableBuilder {
    date: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    country: Option<String>,
    state: Option<String>,
    county: Option<String>,
    inputs: Vec<Arc<Variable>>,
    date_source: Option<Arc<Variable>>,
    location_source: Option<Arc<Variable>>,
    source: Option<String>,
    tag: Option<String>,
}

impl VariableBuilder {
    /// Create a new builder with nothing set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a point date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the start of a date range
    #[must_use]
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Set the end of a date range
    #[must_use]
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the state
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the county
    #[must_use]
    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Add an input this value is derived from
    #[must_use]
    pub fn input(mut self, input: Variable) -> Self {
        self.inputs.push(Arc::new(input));
        self
    }

    /// Add several inputs this value is derived from
    #[must_use]
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = Variable>) -> Self {
        self.inputs.extend(inputs.into_iter().map(Arc::new));
        self
    }

    /// Designate the value whose dates this value inherits
    #[must_use]
    pub fn date_source(mut self, source: Variable) -> Self {
        self.date_source = Some(Arc::new(source));
        self
    }

    /// Designate the value whose location this value inherits
    #[must_use]
    pub fn location_source(mut self, source: Variable) -> Self {
        self.location_source = Some(Arc::new(source));
        self
    }

    /// Set the citation
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the tag
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Validate the builder fields and resolve dates and location
    pub fn build(self) -> Result<Variable, VariableError> {
        let direct_dates = parse_direct_dates(
            self.date.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?;
        let direct_location = Location::from_fields(self.country, self.state, self.county)?;

        let dates = match &self.date_source {
            Some(source) => source.dates,
            None => direct_dates.or_else(|| union_span(&self.inputs)),
        };

        let location = match &self.location_source {
            Some(source) => source.location.clone(),
            None if !direct_location.is_unspecified() => direct_location,
            None => common_location(&self.inputs)?,
        };

        Ok(Variable {
            source: self.source,
            tag: self.tag,
            dates,
            location,
            inputs: self.inputs,
            date_source: self.date_source,
            location_source: self.location_source,
        })
    }
}

fn parse_direct_dates(
    date: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateRange>, VariableError> {
    match (date, start, end) {
        (None, None, None) => Ok(None),
        (Some(date), None, None) => {
            let period: DatePeriod = date.parse()?;
            Ok(Some((period.start_date(), period.end_date())))
        }
        (Some(_), _, _) => Err(VariableError::ConflictingDates),
        (None, Some(start), Some(end)) => {
            let start = start.parse::<DatePeriod>()?.start_date();
            let end = end.parse::<DatePeriod>()?.end_date();
            if end < start {
                return Err(VariableError::InvertedRange { start, end });
            }
            Ok(Some((start, end)))
        }
        (None, _, _) => Err(VariableError::IncompleteDateRange),
    }
}

fn union_span(inputs: &[Arc<Variable>]) -> Option<DateRange> {
    inputs
        .iter()
        .filter_map(|input| input.dates)
        .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2)))
}

fn common_location(inputs: &[Arc<Variable>]) -> Result<Location, VariableError> {
    let mut located = inputs
        .iter()
        .map(|input| &input.location)
        .filter(|location| !location.is_unspecified());

    let Some(first) = located.next() else {
        return Ok(Location::Unspecified);
    };
    for other in located {
        if other != first {
            return Err(VariableError::ConflictingLocation(
                first.summarize(),
                other.summarize(),
            ));
        }
    }
    Ok(first.clone())
}
