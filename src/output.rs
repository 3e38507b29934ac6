//! Tab-separated output tables
//!
//! Three tables are written per run: the model input (one row per sample and
//! fit unit), every posterior draw of `ra_at_1in100`, and a summary of those
//! draws per location.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::estimate::PredictorType;
use crate::mgs::Enrichment;
use crate::model::Model;
use crate::pathogens::{TaxIds, taxids_key};

/// Model input table
pub const INPUT_TABLE: &str = "input";
/// Posterior draws table
pub const FITS_TABLE: &str = "fits";
/// Posterior summary table
pub const FITS_SUMMARY_TABLE: &str = "fits_summary";

/// What a fitted model was fit for
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitKey {
    /// Pathogen name
    pub pathogen: &'static str,
    /// Pathogen display name
    pub tidy_name: &'static str,
    /// Predictor kind
    pub predictor_type: PredictorType,
    /// Taxids reads were counted over
    pub taxids: TaxIds,
    /// Study name
    pub study: &'static str,
}

/// A fitted model and its key
#[derive(Debug, Clone)]
pub struct FittedUnit {
    /// What the model was fit for
    pub key: UnitKey,
    /// The fitted model
    pub model: Model,
}

#[derive(Serialize)]
struct InputRecord<'a> {
    pathogen: &'a str,
    tidy_name: &'a str,
    taxids: &'a str,
    predictor_type: &'a str,
    study: &'a str,
    sample: &'a str,
    bioproject: &'a str,
    date: String,
    country: &'a str,
    state: Option<&'a str>,
    county: Option<&'a str>,
    location: &'a str,
    fine_location: Option<&'a str>,
    enrichment: Option<Enrichment>,
    viral_reads: u64,
    total_reads: u64,
    predictor: Option<f64>,
    num_matched: usize,
    fitted: bool,
}

#[derive(Serialize)]
struct DrawRecord<'a> {
    pathogen: &'a str,
    tidy_name: &'a str,
    taxids: &'a str,
    predictor_type: &'a str,
    study: &'a str,
    location: &'a str,
    draw: usize,
    ra_at_1in100: f64,
}

#[derive(Serialize)]
struct SummaryRecord<'a> {
    pathogen: &'a str,
    tidy_name: &'a str,
    taxids: &'a str,
    predictor_type: &'a str,
    study: &'a str,
    location: &'a str,
    mean: f64,
    std: f64,
    min: f64,
    #[serde(rename = "5%")]
    p5: f64,
    #[serde(rename = "25%")]
    p25: f64,
    #[serde(rename = "50%")]
    p50: f64,
    #[serde(rename = "75%")]
    p75: f64,
    #[serde(rename = "95%")]
    p95: f64,
    max: f64,
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

/// Write one row per sample of every unit, fitted or not
pub fn write_input<W: Write>(units: &[FittedUnit], writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    for unit in units {
        let taxids = taxids_key(&unit.key.taxids);
        for row in unit.model.input_rows() {
            wtr.serialize(InputRecord {
                pathogen: unit.key.pathogen,
                tidy_name: unit.key.tidy_name,
                taxids: &taxids,
                predictor_type: unit.key.predictor_type.as_str(),
                study: unit.key.study,
                sample: &row.sample.0,
                bioproject: &row.bioproject.0,
                date: row.date.format("%Y-%m-%d").to_string(),
                country: &row.country,
                state: row.state.as_deref(),
                county: row.county.as_deref(),
                location: &row.location,
                fine_location: row.fine_location.as_deref(),
                enrichment: row.enrichment,
                viral_reads: row.viral_reads,
                total_reads: row.total_reads,
                predictor: row.predictor(),
                num_matched: row.matched.len(),
                fitted: row.is_fittable(),
            })?;
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write every posterior draw of every coefficient
pub fn write_fits<W: Write>(units: &[FittedUnit], writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    for unit in units {
        let taxids = taxids_key(&unit.key.taxids);
        for coefficient in unit.model.get_coefficients()? {
            for (draw, &value) in coefficient.draws.iter().enumerate() {
                wtr.serialize(DrawRecord {
                    pathogen: unit.key.pathogen,
                    tidy_name: unit.key.tidy_name,
                    taxids: &taxids,
                    predictor_type: unit.key.predictor_type.as_str(),
                    study: unit.key.study,
                    location: &coefficient.location,
                    draw,
                    ra_at_1in100: value,
                })?;
            }
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the summary of every coefficient's pooled draws
pub fn write_fits_summary<W: Write>(units: &[FittedUnit], writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    for unit in units {
        let taxids = taxids_key(&unit.key.taxids);
        for coefficient in unit.model.get_coefficients()? {
            let s = &coefficient.summary;
            wtr.serialize(SummaryRecord {
                pathogen: unit.key.pathogen,
                tidy_name: unit.key.tidy_name,
                taxids: &taxids,
                predictor_type: unit.key.predictor_type.as_str(),
                study: unit.key.study,
                location: &coefficient.location,
                mean: s.mean,
                std: s.std,
                min: s.min,
                p5: s.p5,
                p25: s.p25,
                p50: s.p50,
                p75: s.p75,
                p95: s.p95,
                max: s.max,
            })?;
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::io(path, e))
}

/// Write all three tables into `dir`, named for the configured mode
pub fn write_all(dir: &Path, config: &PipelineConfig, units: &[FittedUnit]) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let input = dir.join(config.output_file(INPUT_TABLE));
    write_input(units, create(&input)?)?;
    let fits = dir.join(config.output_file(FITS_TABLE));
    write_fits(units, create(&fits)?)?;
    let summary = dir.join(config.output_file(FITS_SUMMARY_TABLE));
    write_fits_summary(units, create(&summary)?)?;

    info!("Wrote {} fitted units to {}", units.len(), dir.display());
    Ok(())
}
