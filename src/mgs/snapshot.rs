//! Local JSON snapshot of the sequencing metadata repository

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;

use super::{BioProject, Enrichment, Sample, SampleAttributes, SequencingData};
use crate::error::util::{safe_read_to_string, validate_directory};
use crate::error::{Error, Result};
use crate::pathogens::{TaxId, TaxIds};

/// Bioproject to sample accessions
pub const BIOPROJECTS_FILE: &str = "metadata_bioprojects.json";
/// Sample accession to attributes
pub const SAMPLES_FILE: &str = "metadata_samples.json";
/// Sample accession to total reads
pub const READ_COUNTS_FILE: &str = "sample_read_counts.json";
/// Taxid to sample accession to assigned reads
pub const VIRAL_COUNTS_FILE: &str = "human_virus_sample_counts.json";

/// In-memory sequencing dataset
#[derive(Debug, Clone, Default)]
pub struct MgsData {
    bioprojects: FxHashMap<BioProject, Vec<Sample>>,
    samples: FxHashMap<Sample, SampleAttributes>,
    read_counts: FxHashMap<Sample, u64>,
    viral_counts: FxHashMap<TaxId, FxHashMap<Sample, u64>>,
}

impl MgsData {
    /// Create a dataset from already loaded tables
    #[must_use]
    pub fn new(
        bioprojects: FxHashMap<BioProject, Vec<Sample>>,
        samples: FxHashMap<Sample, SampleAttributes>,
        read_counts: FxHashMap<Sample, u64>,
        viral_counts: FxHashMap<TaxId, FxHashMap<Sample, u64>>,
    ) -> Self {
        Self {
            bioprojects,
            samples,
            read_counts,
            viral_counts,
        }
    }

    /// Load a snapshot directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        validate_directory(dir, "sequencing snapshot")?;

        let data = Self::new(
            read_json(&dir.join(BIOPROJECTS_FILE))?,
            read_json(&dir.join(SAMPLES_FILE))?,
            read_json(&dir.join(READ_COUNTS_FILE))?,
            read_json(&dir.join(VIRAL_COUNTS_FILE))?,
        );
        info!(
            "Loaded sequencing snapshot from {}: {} bioprojects, {} samples, {} taxids",
            dir.display(),
            data.bioprojects.len(),
            data.samples.len(),
            data.viral_counts.len()
        );
        Ok(data)
    }

    fn samples_of(&self, bioproject: &BioProject) -> Result<&[Sample]> {
        self.bioprojects
            .get(bioproject)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownBioproject(bioproject.to_string()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = safe_read_to_string(path, "sequencing snapshot table")?;
    let value = serde_json::from_str(&content).map_err(|e| Error::json(path, e))?;
    debug!("Decoded {}", path.display());
    Ok(value)
}

impl SequencingData for MgsData {
    fn sample_attributes(
        &self,
        bioproject: &BioProject,
        enrichment: Option<Enrichment>,
    ) -> Result<BTreeMap<Sample, SampleAttributes>> {
        let mut attributes = BTreeMap::new();
        for sample in self.samples_of(bioproject)? {
            let attrs = self.samples.get(sample).ok_or_else(|| {
                Error::Dataset(format!("sample {sample} of {bioproject} has no metadata"))
            })?;
            if enrichment.is_some() && attrs.enrichment != enrichment {
                continue;
            }
            attributes.insert(sample.clone(), attrs.clone());
        }
        Ok(attributes)
    }

    fn total_reads(&self, bioproject: &BioProject) -> Result<BTreeMap<Sample, u64>> {
        self.samples_of(bioproject)?
            .iter()
            .map(|sample| {
                let reads = self.read_counts.get(sample).copied().ok_or_else(|| {
                    Error::Dataset(format!("sample {sample} has no read count"))
                })?;
                Ok((sample.clone(), reads))
            })
            .collect()
    }

    fn viral_reads(
        &self,
        bioproject: &BioProject,
        taxids: &TaxIds,
    ) -> Result<BTreeMap<Sample, u64>> {
        let mut reads: BTreeMap<Sample, u64> = self
            .samples_of(bioproject)?
            .iter()
            .map(|sample| (sample.clone(), 0))
            .collect();

        for taxid in taxids {
            let Some(counts) = self.viral_counts.get(taxid) else {
                continue;
            };
            for (sample, total) in &mut reads {
                *total += counts.get(sample).copied().unwrap_or(0);
            }
        }
        Ok(reads)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_snapshot(dir: &Path) {
        fs::write(
            dir.join(BIOPROJECTS_FILE),
            r#"{"PRJNA729801": ["SRR1", "SRR2"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join(SAMPLES_FILE),
            r#"{
                "SRR1": {"country": "United States", "state": "California",
                         "county": "Los Angeles County", "date": "2020-09-01",
                         "reads": 100, "location": "HTP", "enrichment": "viral"},
                "SRR2": {"country": "United States", "state": "California",
                         "county": "Los Angeles County", "date": "2020-09-02",
                         "reads": 200, "location": "HTP"}
            }"#,
        )
        .unwrap();
        fs::write(dir.join(READ_COUNTS_FILE), r#"{"SRR1": 100, "SRR2": 200}"#).unwrap();
        fs::write(
            dir.join(VIRAL_COUNTS_FILE),
            r#"{"147711": {"SRR1": 3}, "147712": {"SRR1": 1, "SRR2": 5}}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path());
        let data = MgsData::from_dir(dir.path()).unwrap();
        let bioproject = BioProject::from("PRJNA729801");

        let all = data.sample_attributes(&bioproject, None).unwrap();
        assert_eq!(all.len(), 2);
        let viral = data
            .sample_attributes(&bioproject, Some(Enrichment::Viral))
            .unwrap();
        assert_eq!(viral.keys().collect::<Vec<_>>(), [&Sample::from("SRR1")]);

        let totals = data.total_reads(&bioproject).unwrap();
        assert_eq!(totals[&Sample::from("SRR2")], 200);
    }

    #[test]
    fn test_viral_reads_sum_over_taxids() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path());
        let data = MgsData::from_dir(dir.path()).unwrap();
        let bioproject = BioProject::from("PRJNA729801");

        let taxids = TaxIds::from([TaxId(147_711), TaxId(147_712)]);
        let reads = data.viral_reads(&bioproject, &taxids).unwrap();
        assert_eq!(reads[&Sample::from("SRR1")], 4);
        assert_eq!(reads[&Sample::from("SRR2")], 5);

        let absent = TaxIds::from([TaxId(1)]);
        let zeros = data.viral_reads(&bioproject, &absent).unwrap();
        assert_eq!(zeros.values().copied().collect::<Vec<_>>(), [0, 0]);
    }

    #[test]
    fn test_unknown_bioproject() {
        let data = MgsData::default();
        assert!(matches!(
            data.total_reads(&BioProject::from("PRJNA0")),
            Err(Error::UnknownBioproject(_))
        ));
    }

    #[test]
    fn test_missing_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(MgsData::from_dir(dir.path()), Err(Error::Io { .. })));
    }
}
