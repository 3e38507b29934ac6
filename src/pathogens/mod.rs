//! Pathogen catalog
//!
//! Each catalog pathogen declares its static characteristics and the
//! literature estimates it can be predicted from. Pathogens form a closed set
//! ([`Pathogen`]) sharing the [`PathogenDefinition`] interface, and are
//! looked up by name through an explicit [`PathogenRegistry`].

pub mod bkv;
pub mod chars;
pub mod norovirus;
pub mod registry;
pub mod rhinovirus;

pub use bkv::Bkv;
pub use chars::{
    Enveloped, NaType, PathogenChars, SelectionRound, TaxId, TaxIds, taxids_key,
};
pub use norovirus::Norovirus;
pub use registry::{PathogenRegistry, PredictorSet};
pub use rhinovirus::Rhinovirus;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::estimate::{IncidenceRate, Predictor, Prevalence};

/// Capabilities every catalog pathogen provides
pub trait PathogenDefinition {
    /// Short identifier used on the command line and in output tables
    fn name(&self) -> &'static str;

    /// Display name
    fn tidy_name(&self) -> &'static str;

    /// Short description
    fn background(&self) -> &'static str;

    /// Static characteristics
    fn pathogen_chars(&self) -> PathogenChars;

    /// Prevalence estimates
    fn estimate_prevalences(&self) -> Result<Vec<Prevalence>> {
        Ok(Vec::new())
    }

    /// Incidence estimates
    fn estimate_incidences(&self) -> Result<Vec<IncidenceRate>> {
        Ok(Vec::new())
    }
}

/// The catalog pathogens
#[derive(Debug, Clone, PartialEq)]
pub enum Pathogen {
    /// Norovirus
    Norovirus(Norovirus),
    /// Rhinovirus A, B and C
    Rhinovirus(Rhinovirus),
    /// BK polyomavirus
    Bkv(Bkv),
}

impl Pathogen {
    fn definition(&self) -> &dyn PathogenDefinition {
        match self {
            Self::Norovirus(p) => p,
            Self::Rhinovirus(p) => p,
            Self::Bkv(p) => p,
        }
    }
}

impl PathogenDefinition for Pathogen {
    fn name(&self) -> &'static str {
        self.definition().name()
    }

    fn tidy_name(&self) -> &'static str {
        self.definition().tidy_name()
    }

    fn background(&self) -> &'static str {
        self.definition().background()
    }

    fn pathogen_chars(&self) -> PathogenChars {
        self.definition().pathogen_chars()
    }

    fn estimate_prevalences(&self) -> Result<Vec<Prevalence>> {
        self.definition().estimate_prevalences()
    }

    fn estimate_incidences(&self) -> Result<Vec<IncidenceRate>> {
        self.definition().estimate_incidences()
    }
}

impl From<Norovirus> for Pathogen {
    fn from(p: Norovirus) -> Self {
        Self::Norovirus(p)
    }
}

impl From<Rhinovirus> for Pathogen {
    fn from(p: Rhinovirus) -> Self {
        Self::Rhinovirus(p)
    }
}

impl From<Bkv> for Pathogen {
    fn from(p: Bkv) -> Self {
        Self::Bkv(p)
    }
}

/// Group predictors by the taxids their reads should be counted over
///
/// A predictor restricted to a single taxid forms its own group; every other
/// predictor counts reads over all of the pathogen's taxids.
#[must_use]
pub fn by_taxids(
    chars: &PathogenChars,
    predictors: impl IntoIterator<Item = Predictor>,
) -> BTreeMap<TaxIds, Vec<Predictor>> {
    let mut groups: BTreeMap<TaxIds, Vec<Predictor>> = BTreeMap::new();
    for predictor in predictors {
        let taxids = match predictor.taxid() {
            Some(taxid) => TaxIds::from([taxid]),
            None => chars.taxids.clone(),
        };
        groups.entry(taxids).or_default().push(predictor);
    }
    groups
}
