//! Shared fixtures

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use p2ra::estimate::{Active, Prevalence};
use p2ra::mgs::{BioProject, Enrichment, MgsData, Sample, SampleAttributes, target_bioprojects};
use p2ra::pathogens::TaxId;
use p2ra::variable::Variable;

/// Bioproject of the rothman study
pub const ROTHMAN: &str = "PRJNA729801";

/// Taxid the fixture reports viral reads for
pub const FIXTURE_TAXID: TaxId = TaxId(147_711);

#[must_use]
pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A sample collected in Allegheny County, Pennsylvania on 2019-05-14
#[must_use]
pub fn allegheny_sample() -> SampleAttributes {
    SampleAttributes {
        country: "United States".to_string(),
        state: Some("Pennsylvania".to_string()),
        county: Some("Allegheny County".to_string()),
        date: ymd(2019, 5, 14),
        reads: 100,
        location: "Pittsburgh".to_string(),
        fine_location: None,
        enrichment: None,
        method: None,
    }
}

fn la_sample(day: u32, location: &str, enrichment: Option<Enrichment>) -> SampleAttributes {
    SampleAttributes {
        country: "United States".to_string(),
        state: Some("California".to_string()),
        county: Some("Los Angeles County".to_string()),
        date: ymd(2020, 9, day),
        reads: 1_000_000,
        location: location.to_string(),
        fine_location: None,
        enrichment,
        method: None,
    }
}

/// Four Los Angeles samples over two plants, one of them panel-enriched
///
/// Every other study's bioprojects exist but hold no samples.
#[must_use]
pub fn la_dataset() -> MgsData {
    let samples = [
        ("SRR1", la_sample(1, "HTP", Some(Enrichment::Viral)), 1_000_000, 12),
        ("SRR2", la_sample(8, "HTP", Some(Enrichment::Viral)), 2_000_000, 30),
        ("SRR3", la_sample(1, "JWPCP", Some(Enrichment::Viral)), 1_500_000, 0),
        ("SRR4", la_sample(15, "JWPCP", Some(Enrichment::Panel)), 1_000_000, 7),
    ];

    let mut bioprojects = FxHashMap::default();
    let mut attributes = FxHashMap::default();
    let mut read_counts = FxHashMap::default();
    let mut viral = FxHashMap::default();
    for (id, attrs, total, hits) in samples {
        let sample = Sample::from(id);
        bioprojects
            .entry(BioProject::from(ROTHMAN))
            .or_insert_with(Vec::new)
            .push(sample.clone());
        attributes.insert(sample.clone(), attrs);
        read_counts.insert(sample.clone(), total);
        if hits > 0 {
            viral.insert(sample, hits);
        }
    }

    for bioproject in target_bioprojects().into_iter().flat_map(|(_, b)| b) {
        bioprojects.entry(bioproject).or_insert_with(Vec::new);
    }

    let mut viral_counts = FxHashMap::default();
    viral_counts.insert(FIXTURE_TAXID, viral);
    MgsData::new(bioprojects, attributes, read_counts, viral_counts)
}

/// A US-wide active prevalence for one period
#[must_use]
pub fn us_prevalence(per_100k: f64, date: &str) -> Prevalence {
    let variable = Variable::builder()
        .country("United States")
        .date(date)
        .build()
        .unwrap();
    Prevalence::new(per_100k, Active::Active, variable)
}
