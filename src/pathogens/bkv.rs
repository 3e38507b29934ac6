//! BK polyomavirus seroprevalence
//!
//! BKV stays latent after infection and is not targeted by treatments or
//! vaccines, so older seroprevalence surveys are extrapolated to the years
//! and places the sequencing studies cover.

use super::PathogenDefinition;
use super::chars::{Enveloped, NaType, PathogenChars, SelectionRound, TaxId};
use crate::error::Result;
use crate::estimate::{Active, Prevalence};
use crate::variable::Variable;

const SWISS_BLOOD_DONORS: &str = "https://academic.oup.com/jid/article/199/6/837/2192120";
const US_BLOOD_DONORS: &str = "https://journals.plos.org/plospathogens/article?id=10.1371/journal.ppat.1000363";

/// BK polyomavirus catalog entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bkv;

/// Swiss 2009 survey: 82% of 400 healthy blood donors seropositive
fn swiss_2009(date_source: &str, location_source: &str) -> Result<Prevalence> {
    let variable = Variable::builder()
        .country("Switzerland")
        .date("2009")
        .source(SWISS_BLOOD_DONORS)
        .date_source(Variable::builder().date(date_source).build()?)
        .location_source(Variable::builder().country(location_source).build()?)
        .build()?;
    Ok(Prevalence::new(0.82 * 100_000.0, Active::Latent, variable).with_participants(400))
}

/// US 2007 survey: 82% of 1501 adult blood donors seropositive
fn us_2007(date_source: &str) -> Result<Prevalence> {
    let variable = Variable::builder()
        .country("United States")
        .date("2007")
        .source(US_BLOOD_DONORS)
        .date_source(Variable::builder().date(date_source).build()?)
        .build()?;
    Ok(Prevalence::new(0.82 * 100_000.0, Active::Latent, variable).with_participants(1501))
}

impl PathogenDefinition for Bkv {
    fn name(&self) -> &'static str {
        "bkv"
    }

    fn tidy_name(&self) -> &'static str {
        "BK polyomavirus"
    }

    fn background(&self) -> &'static str {
        "BK virus is a common virus which has minimal impact in immunocompetent humans."
    }

    fn pathogen_chars(&self) -> PathogenChars {
        PathogenChars::single(NaType::Dna, Enveloped::NonEnveloped, TaxId(1_891_762))
            .selection(SelectionRound::Round2)
    }

    /// Seroprevalence surveys extrapolated to 2020-2021 (US) and 2015-2018
    /// (Denmark)
    ///
    /// BKV was picked after its abundance in sequencing data was seen, which
    /// makes it a second round pathogen. These estimates are returned as
    /// they are, but the pipeline only fits them when second round pathogens
    /// are requested; a default run excludes BKV.
    fn estimate_prevalences(&self) -> Result<Vec<Prevalence>> {
        let mut prevalences = vec![us_2007("2020")?, us_2007("2021")?];
        for year in ["2015", "2016", "2017", "2018"] {
            prevalences.push(swiss_2009(year, "Denmark")?);
        }
        Ok(prevalences)
    }
}
