//! US census population lookups
//!
//! Populations are read from a tab-separated census extract with one row per
//! place and year:
//!
//! ```text
//! state	county	year	people
//! 	 	2020	331449281
//! California		2020	39538223
//! California	Los Angeles County	2020	10014009
//! ```
//!
//! An empty `state` means the whole country, an empty `county` the whole
//! state.

use std::io::Read;
use std::path::Path;

use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::estimate::Population;
use crate::variable::Variable;

const COUNTRY: &str = "United States";
const CENSUS_SOURCE: &str = "https://www.census.gov/data/tables/time-series/demo/popest/2020s-counties-total.html";

type PlaceKey = (Option<String>, Option<String>, i32);

#[derive(Debug, Deserialize)]
struct CensusRow {
    state: Option<String>,
    county: Option<String>,
    year: i32,
    people: f64,
}

/// Census population table
#[derive(Debug, Clone, Default)]
pub struct UsPopulations {
    people: FxHashMap<PlaceKey, f64>,
}

impl UsPopulations {
    /// Load the census table from a file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "census populations")?;
        let populations = Self::from_reader(file)?;
        debug!(
            "Loaded {} census populations from {}",
            populations.len(),
            path.display()
        );
        Ok(populations)
    }

    /// Parse a census table from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut people = FxHashMap::default();
        for row in tsv.deserialize() {
            let row: CensusRow = row?;
            let key = (non_empty(row.state), non_empty(row.county), row.year);
            if key.0.is_none() && key.1.is_some() {
                return Err(Error::Catalog(format!(
                    "census row for county {:?} has no state",
                    key.1
                )));
            }
            people.insert(key, row.people);
        }
        Ok(Self { people })
    }

    /// Number of places and years in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Population of a US place in mid-`year`
    ///
    /// With no state this is the national population; with a state but no
    /// county it is the state's.
    pub fn us_population(
        &self,
        state: Option<&str>,
        county: Option<&str>,
        year: i32,
    ) -> Result<Population> {
        let key = (state.map(str::to_string), county.map(str::to_string), year);
        let Some(&people) = self.people.get(&key) else {
            let place = [county, state, Some(COUNTRY)]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::MissingPopulation { place, year });
        };

        let mut variable = Variable::builder()
            .country(COUNTRY)
            .date(format!("{year}-07-01"))
            .source(CENSUS_SOURCE);
        if let Some(state) = state {
            variable = variable.state(state);
        }
        if let Some(county) = county {
            variable = variable.county(county);
        }
        Ok(Population::new(people, variable.build()?))
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
