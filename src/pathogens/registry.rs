//! Explicit pathogen registry
//!
//! The registry owns the loaded catalog pathogens and is passed to whatever
//! needs them; there is no process-wide pathogen list.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use rustc_hash::FxHashSet;

use super::{Bkv, Norovirus, Pathogen, PathogenDefinition, Rhinovirus, TaxIds, by_taxids};
use crate::error::util::validate_directory;
use crate::error::{Error, Result};
use crate::estimate::{Predictor, PredictorType};
use crate::pathogens::chars::SelectionRound;
use crate::populations::UsPopulations;
use crate::variable::Variable;

/// NORS dashboard export inside the catalog directory
pub const NORS_FILE: &str = "cdc-nors-outbreak-data.tsv";
/// Census extract inside the catalog directory
pub const CENSUS_FILE: &str = "us-census-populations.tsv";

/// Predictors of one kind for one pathogen and taxid group
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorSet {
    /// Pathogen name
    pub pathogen: &'static str,
    /// Pathogen display name
    pub tidy_name: &'static str,
    /// Kind of every predictor in the set
    pub predictor_type: PredictorType,
    /// Taxids reads are counted over
    pub taxids: TaxIds,
    /// The predictors
    pub predictors: Vec<Predictor>,
}

/// Catalog pathogens keyed by name
#[derive(Debug, Clone, Default)]
pub struct PathogenRegistry {
    pathogens: BTreeMap<&'static str, Pathogen>,
}

impl PathogenRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every catalog pathogen from a directory of input tables
    pub fn load(catalog_dir: &Path) -> Result<Self> {
        validate_directory(catalog_dir, "pathogen catalog")?;

        let populations = UsPopulations::from_path(&catalog_dir.join(CENSUS_FILE))?;
        let mut registry = Self::new();
        registry.register(Norovirus::from_path(&catalog_dir.join(NORS_FILE))?)?;
        registry.register(Rhinovirus::new(&populations)?)?;
        registry.register(Bkv)?;

        info!(
            "Loaded {} pathogens from {}",
            registry.len(),
            catalog_dir.display()
        );
        Ok(registry)
    }

    /// Add a pathogen; names must be unique
    pub fn register(&mut self, pathogen: impl Into<Pathogen>) -> Result<()> {
        let pathogen = pathogen.into();
        let name = pathogen.name();
        if self.pathogens.contains_key(name) {
            return Err(Error::Catalog(format!("pathogen {name} registered twice")));
        }
        debug!("Registered pathogen {name}");
        self.pathogens.insert(name, pathogen);
        Ok(())
    }

    /// Look up a pathogen by name
    pub fn get(&self, name: &str) -> Result<&Pathogen> {
        self.pathogens
            .get(name)
            .ok_or_else(|| Error::UnknownPathogen(name.to_string()))
    }

    /// Registered pathogens in name order
    pub fn iter(&self) -> impl Iterator<Item = &Pathogen> {
        self.pathogens.values()
    }

    /// Number of registered pathogens
    #[must_use]
    pub fn len(&self) -> usize {
        self.pathogens.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pathogens.is_empty()
    }

    /// Every non-empty predictor set, grouped by pathogen, kind and taxids
    ///
    /// Pathogens selected in the second round are skipped unless
    /// `include_round_2` is set.
    pub fn predictors_by_taxid(&self, include_round_2: bool) -> Result<Vec<PredictorSet>> {
        let mut sets = Vec::new();
        for pathogen in self.iter() {
            let chars = pathogen.pathogen_chars();
            if chars.selection == SelectionRound::Round2 && !include_round_2 {
                debug!("Skipping round 2 pathogen {}", pathogen.name());
                continue;
            }

            let prevalences = pathogen
                .estimate_prevalences()?
                .into_iter()
                .map(Predictor::from);
            let incidences = pathogen
                .estimate_incidences()?
                .into_iter()
                .map(Predictor::from);

            for (predictor_type, groups) in [
                (PredictorType::Prevalence, by_taxids(&chars, prevalences)),
                (PredictorType::Incidence, by_taxids(&chars, incidences)),
            ] {
                for (taxids, predictors) in groups {
                    if predictors.is_empty() {
                        continue;
                    }
                    sets.push(PredictorSet {
                        pathogen: pathogen.name(),
                        tidy_name: pathogen.tidy_name(),
                        predictor_type,
                        taxids,
                        predictors,
                    });
                }
            }
        }
        Ok(sets)
    }

    /// Check catalog invariants over every pathogen, second round included
    pub fn validate(&self) -> Result<()> {
        validate_sets(&self.predictors_by_taxid(true)?)
    }
}

/// Check predictor sets for catalog mistakes
///
/// Every estimate must be dated and located, and no two estimates in one set
/// may apply to the same dates and place. Sets are checked independently, so
/// the same estimate may appear under different taxid groups.
pub fn validate_sets(sets: &[PredictorSet]) -> Result<()> {
    for set in sets {
        let mut seen = FxHashSet::default();
        for predictor in &set.predictors {
            let variable: &Variable = predictor.as_ref();
            let dates = variable.get_dates()?;
            let location = variable.get_location()?.summarize();
            if !seen.insert((dates, location.clone())) {
                return Err(Error::Catalog(format!(
                    "duplicate {} estimate for {} in {location} ({})",
                    set.predictor_type,
                    set.pathogen,
                    variable.summarize_date()
                )));
            }
        }
    }
    Ok(())
}
