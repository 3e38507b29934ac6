//! Static characteristics of a pathogen

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// NCBI taxonomic identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(pub u32);

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of taxids, the unit predictors and read counts are grouped by
pub type TaxIds = BTreeSet<TaxId>;

/// Render a taxid set the way output tables key it ("147711_147712")
#[must_use]
pub fn taxids_key(taxids: &TaxIds) -> String {
    taxids.iter().join("_")
}

/// Nucleic acid type of the genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaType {
    /// DNA virus
    Dna,
    /// RNA virus
    Rna,
}

/// Whether the virion carries a lipid envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enveloped {
    /// Lipid envelope present
    Enveloped,
    /// No envelope
    NonEnveloped,
}

/// When the pathogen was selected for analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectionRound {
    /// Chosen before looking at sequencing data
    #[default]
    Round1,
    /// Chosen after it showed up with high relative abundance
    Round2,
}

/// Characteristics shared by every estimate of a pathogen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathogenChars {
    /// Nucleic acid type
    pub na_type: NaType,
    /// Envelope status
    pub enveloped: Enveloped,
    /// Taxids whose reads count towards this pathogen
    pub taxids: TaxIds,
    /// Selection round tag
    pub selection: SelectionRound,
}

impl PathogenChars {
    /// Characteristics of a pathogen identified by a single taxid
    #[must_use]
    pub fn single(na_type: NaType, enveloped: Enveloped, taxid: TaxId) -> Self {
        Self::with_taxids(na_type, enveloped, [taxid])
    }

    /// Characteristics of a pathogen spanning several taxids
    #[must_use]
    pub fn with_taxids(
        na_type: NaType,
        enveloped: Enveloped,
        taxids: impl IntoIterator<Item = TaxId>,
    ) -> Self {
        Self {
            na_type,
            enveloped,
            taxids: taxids.into_iter().collect(),
            selection: SelectionRound::default(),
        }
    }

    /// Set the selection round
    #[must_use]
    pub fn selection(mut self, selection: SelectionRound) -> Self {
        self.selection = selection;
        self
    }
}
