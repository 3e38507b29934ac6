//! Norovirus prevalence from the NORS outbreak series
//!
//! A national 2006 estimate of annual cases is converted to a pre-COVID
//! prevalence, then scaled month by month by how far that month's daily
//! outbreak count sits above or below the 2012-2019 average.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::PathogenDefinition;
use super::chars::{Enveloped, NaType, PathogenChars, TaxId};
use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::estimate::{
    Estimate, IncidenceAbsolute, Population, Prevalence, Scalar, SheddingDuration,
};
use crate::variable::{Variable, VariableBuilder, days_in_month};

const HISTORY_START: i32 = 2012;
const HISTORY_END: i32 = 2019;

const SCALLAN_2011: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3375761/";
const NORS_DASHBOARD: &str = "https://wwwn.cdc.gov/norsdashboard/";
const MAYO_SHEDDING: &str = "https://www.mayoclinic.org/diseases-conditions/norovirus/symptoms-causes/syc-20355296";

/// Outbreak counts keyed by (year, month)
pub type MonthlyCounts = BTreeMap<(i32, u32), f64>;

#[derive(Debug, Deserialize)]
struct NorsRecord {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Etiology")]
    etiology: String,
}

/// Norovirus catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Norovirus {
    outbreaks: MonthlyCounts,
}

impl Norovirus {
    /// Create from already counted monthly outbreaks
    #[must_use]
    pub fn new(outbreaks: MonthlyCounts) -> Self {
        Self { outbreaks }
    }

    /// Load the NORS dashboard export
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "NORS outbreak data")?;
        Self::from_reader(file)
    }

    /// Count norovirus outbreaks per month in a NORS export
    ///
    /// Rows for other etiologies are skipped. Every month of the history
    /// window is present in the result, zero when nothing was reported.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut outbreaks: MonthlyCounts = (HISTORY_START..=HISTORY_END)
            .flat_map(|year| (1..=12).map(move |month| ((year, month), 0.0)))
            .collect();

        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);
        let mut skipped = 0usize;
        for record in tsv.deserialize() {
            let record: NorsRecord = record?;
            if !record.etiology.contains("Norovirus") {
                skipped += 1;
                continue;
            }
            *outbreaks.entry((record.year, record.month)).or_insert(0.0) += 1.0;
        }
        debug!("Skipped {skipped} non-norovirus NORS outbreaks");

        Ok(Self { outbreaks })
    }

    /// Monthly outbreak counts
    #[must_use]
    pub const fn outbreaks(&self) -> &MonthlyCounts {
        &self.outbreaks
    }

    fn daily_outbreaks(&self, year: i32, month: u32) -> f64 {
        let count = self.outbreaks.get(&(year, month)).copied().unwrap_or(0.0);
        count / f64::from(days_in_month(year, month))
    }

    fn average_daily_outbreaks(&self) -> f64 {
        let mut total = 0.0;
        let mut days = 0u32;
        for year in HISTORY_START..=HISTORY_END {
            for month in 1..=12 {
                total += self.outbreaks.get(&(year, month)).copied().unwrap_or(0.0);
                days += days_in_month(year, month);
            }
        }
        total / f64::from(days)
    }
}

fn us_2006() -> VariableBuilder {
    Variable::builder().country("United States").date("2006")
}

/// Pre-COVID national prevalence implied by the 2006 case estimate
fn national_prevalence() -> Result<Prevalence> {
    let foodborne_cases = IncidenceAbsolute::new(
        5_461_731.0,
        us_2006().tag("us-2006").source(SCALLAN_2011).build()?,
    )
    .with_interval(3_227_078.0, 8_309_480.0, 0.9);
    let total_relative_to_foodborne =
        Scalar::new(1.0 / 0.26, us_2006().source(SCALLAN_2011).build()?);
    let population = Population::new(
        299_000_000.0,
        us_2006().tag("us-2006").source(SCALLAN_2011).build()?,
    );
    let shedding =
        SheddingDuration::new(2.0, Variable::builder().source(MAYO_SHEDDING).build()?)
            .with_interval(1.0, 3.0);

    let prevalence = foodborne_cases
        .to_rate(&population)?
        .to_prevalence(&shedding)?;
    Ok((prevalence * &total_relative_to_foodborne)?)
}

impl PathogenDefinition for Norovirus {
    fn name(&self) -> &'static str {
        "norovirus"
    }

    fn tidy_name(&self) -> &'static str {
        "Norovirus"
    }

    fn background(&self) -> &'static str {
        "Norovirus is a GI infection, mostly spread through personal contact."
    }

    fn pathogen_chars(&self) -> PathogenChars {
        PathogenChars::single(NaType::Rna, Enveloped::NonEnveloped, TaxId(142_786))
    }

    fn estimate_prevalences(&self) -> Result<Vec<Prevalence>> {
        let average = self.average_daily_outbreaks();
        if average <= 0.0 {
            return Err(Error::Catalog(format!(
                "no norovirus outbreaks reported {HISTORY_START}-{HISTORY_END}"
            )));
        }
        let national = national_prevalence()?;

        let mut prevalences = Vec::new();
        for year in HISTORY_START..=HISTORY_END {
            for month in 1..=12 {
                let target_date = format!("{year}-{month:02}");
                let seasonal = Scalar::new(
                    self.daily_outbreaks(year, month) / average,
                    Variable::builder()
                        .country("United States")
                        .date(target_date.as_str())
                        .source(NORS_DASHBOARD)
                        .build()?,
                );
                let monthly = (&national * &seasonal)?.target(
                    Variable::builder()
                        .country("United States")
                        .date(target_date),
                )?;
                prevalences.push(monthly);
            }
        }
        Ok(prevalences)
    }
}
