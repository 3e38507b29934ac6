//! Rhinovirus prevalence from Los Angeles County respiratory illness rates

use super::PathogenDefinition;
use super::chars::{Enveloped, NaType, PathogenChars, TaxId};
use crate::error::Result;
use crate::estimate::{
    Estimate, IncidenceAbsolute, Population, Prevalence, Scalar, SheddingDuration,
};
use crate::populations::UsPopulations;
use crate::variable::Variable;

/// Rhinovirus A
pub const RHINOVIRUS_A: TaxId = TaxId(147_711);
/// Rhinovirus B
pub const RHINOVIRUS_B: TaxId = TaxId(147_712);
/// Rhinovirus C
pub const RHINOVIRUS_C: TaxId = TaxId(463_676);

const UNDER_18_SHARE: f64 = 0.211;
const RHINOVIRUS_SHARE_OF_COLDS: f64 = 0.34;

const QUICKFACTS: &str = "https://www.census.gov/quickfacts/fact/table/losangelescountycalifornia";
const FAMILY_STUDY: &str = "doi.org/10.1017/S0950268800050779#?page=6";
const CLEVELAND_CLINIC: &str = "https://my.clevelandclinic.org/health/diseases/12342-common-cold";
const SHEDDING_REVIEW: &str = "https://erj.ersjournals.com/content/44/1/169";
const RCGP_REPORT: &str = "https://www.rcgp.org.uk/getmedia/e564cc01-bc66-4165-aba5-c762b693f50d/2020-December.zip";

/// Rhinovirus catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Rhinovirus {
    la_county: Population,
}

impl Rhinovirus {
    /// Create the entry from the 2020 Los Angeles County census population
    pub fn new(populations: &UsPopulations) -> Result<Self> {
        let la_county =
            populations.us_population(Some("California"), Some("Los Angeles County"), 2020)?;
        Ok(Self { la_county })
    }

    fn age_band(&self, share: f64, tag: &str) -> Result<Population> {
        let variable = Variable::builder()
            .date("2020")
            .tag(tag)
            .source(QUICKFACTS)
            .build()?;
        Ok(Population::new(share * self.la_county.people, variable))
    }

    fn shedding() -> Result<SheddingDuration> {
        Ok(
            SheddingDuration::new(12.0, Variable::builder().source(SHEDDING_REVIEW).build()?)
                .with_interval(10.0, 14.0),
        )
    }

    /// Fall share of colds caused by rhinovirus, averaged over four studies
    fn fall_share_of_colds() -> Scalar {
        Scalar::new((0.82 + 0.77 + 0.65 + 0.82) / 4.0, Variable::default())
    }

    fn pandemic_decrease() -> Result<Scalar> {
        Ok(Scalar::new(
            0.4,
            Variable::builder()
                .date("2020")
                .source(RCGP_REPORT)
                .build()?,
        ))
    }

    /// US prevalence from age-banded illness rates in a family cohort
    fn prevalence_from_family_study(&self) -> Result<Prevalence> {
        let under_18 = self.age_band(UNDER_18_SHARE, "under 18")?;
        let adults = self.age_band(1.0 - UNDER_18_SHARE, "over 18")?;
        let shedding = Self::shedding()?;

        let under_18_illnesses = (539.0 * 4.9 + 1541.0 * 2.8) / (539.0 + 1541.0);
        let adult_illnesses = (1523.0 * 2.2 + 1757.0 * 1.6) / (1523.0 + 1757.0);

        let mut by_age = Vec::with_capacity(2);
        for (illnesses, population, tag) in [
            (under_18_illnesses, &under_18, "under 18"),
            (adult_illnesses, &adults, "over 18"),
        ] {
            let infections = IncidenceAbsolute::new(
                illnesses * RHINOVIRUS_SHARE_OF_COLDS * population.people,
                Variable::builder()
                    .date("2020")
                    .tag(tag)
                    .source(FAMILY_STUDY)
                    .build()?,
            );
            let prevalence = infections
                .to_rate(population)?
                .to_prevalence(&shedding)?
                .target(Variable::builder().country("United States"))?;
            by_age.push(prevalence);
        }

        Ok((&by_age[0] + &by_age[1])?)
    }

    /// Los Angeles County prevalence from typical cold frequency
    fn prevalence_from_colds(
        &self,
        under_18: &Population,
        adults: &Population,
    ) -> Result<Prevalence> {
        let colds = IncidenceAbsolute::new(
            3.75 * adults.people + 6.0 * under_18.people,
            Variable::builder()
                .country("United States")
                .state("California")
                .county("Los Angeles County")
                .date("2020")
                .source(CLEVELAND_CLINIC)
                .build()?,
        );
        let prevalence = colds
            .to_rate(&self.la_county)?
            .to_prevalence(&Self::shedding()?)?;
        Ok((prevalence * &Self::fall_share_of_colds())?)
    }
}

impl PathogenDefinition for Rhinovirus {
    fn name(&self) -> &'static str {
        "rhinovirus"
    }

    fn tidy_name(&self) -> &'static str {
        "Rhinovirus"
    }

    fn background(&self) -> &'static str {
        "Rhinoviruses are the most frequent cause of the common cold. They \
         declined somewhat less than other respiratory viruses during the \
         pandemic and are not strongly seasonal."
    }

    fn pathogen_chars(&self) -> PathogenChars {
        PathogenChars::with_taxids(
            NaType::Rna,
            Enveloped::NonEnveloped,
            [RHINOVIRUS_A, RHINOVIRUS_B, RHINOVIRUS_C],
        )
    }

    fn estimate_prevalences(&self) -> Result<Vec<Prevalence>> {
        let pandemic = Self::pandemic_decrease()?;
        let under_18 = self.age_band(UNDER_18_SHARE, "under 18")?;
        let adults = self.age_band(1.0 - UNDER_18_SHARE, "over 18")?;

        let national = self.prevalence_from_family_study()?;
        let la_county = self.prevalence_from_colds(&under_18, &adults)?;

        Ok(vec![(national * &pandemic)?, (la_county * &pandemic)?])
    }
}
