#[cfg(test)]
mod tests {
    use p2ra::error::Error;
    use p2ra::estimate::{Active, Predictor, Prevalence};
    use p2ra::mgs::{BioProject, Enrichment, Sample};
    use p2ra::model::{ModelState, build_model};
    use p2ra::pathogens::{TaxId, TaxIds};
    use p2ra::variable::Variable;

    use crate::common::{FIXTURE_TAXID, ROTHMAN, la_dataset, us_prevalence};

    fn la_county_prevalence(per_100k: f64) -> Predictor {
        let variable = Variable::builder()
            .country("United States")
            .state("California")
            .county("Los Angeles County")
            .date("2020-09")
            .build()
            .unwrap();
        Prevalence::new(per_100k, Active::Active, variable).into()
    }

    fn taxids() -> TaxIds {
        TaxIds::from([FIXTURE_TAXID])
    }

    #[test]
    fn test_one_row_per_filtered_sample() {
        let model = build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &[la_county_prevalence(500.0)],
            &taxids(),
            1,
            Some(Enrichment::Viral),
        )
        .unwrap()
        .unwrap();

        let rows = model.input_rows();
        let samples: Vec<_> = rows.iter().map(|r| r.sample.clone()).collect();
        assert_eq!(
            samples,
            [Sample::from("SRR1"), Sample::from("SRR2"), Sample::from("SRR3")]
        );
        assert_eq!(rows[1].total_reads, 2_000_000);
        assert_eq!(rows[1].viral_reads, 30);
        assert_eq!(rows[2].viral_reads, 0);
        assert!(rows.iter().all(|r| r.predictor() == Some(500.0)));
        assert_eq!(model.state(), &ModelState::Built);
        assert_eq!(model.random_seed(), 1);
    }

    #[test]
    fn test_unfiltered_includes_every_sample() {
        let model = build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &[la_county_prevalence(500.0)],
            &taxids(),
            1,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(model.input_rows().len(), 4);
    }

    #[test]
    fn test_county_estimate_beats_national() {
        let predictors = [
            Predictor::from(us_prevalence(100.0, "2020-09")),
            la_county_prevalence(700.0),
        ];
        let model = build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &predictors,
            &taxids(),
            1,
            None,
        )
        .unwrap()
        .unwrap();
        assert!(model.input_rows().iter().all(|r| r.predictor() == Some(700.0)));
    }

    #[test]
    fn test_no_matches_gives_none() {
        let denmark = Variable::builder()
            .country("Denmark")
            .date("2020-09")
            .build()
            .unwrap();
        let predictors = [Predictor::from(Prevalence::new(
            10.0,
            Active::Active,
            denmark,
        ))];
        let model = build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &predictors,
            &taxids(),
            1,
            None,
        )
        .unwrap();
        assert!(model.is_none());
    }

    #[test]
    fn test_unknown_bioproject() {
        let result = build_model(
            &la_dataset(),
            &[BioProject::from("PRJNA0")],
            &[la_county_prevalence(500.0)],
            &TaxIds::from([TaxId(1)]),
            1,
            None,
        );
        assert!(matches!(result, Err(Error::UnknownBioproject(_))));
    }

    #[test]
    fn test_posterior_requires_fit() {
        let model = build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &[la_county_prevalence(500.0)],
            &taxids(),
            1,
            None,
        )
        .unwrap()
        .unwrap();
        assert!(matches!(model.get_coefficients(), Err(Error::ModelNotFit)));
        assert!(matches!(model.get_output_by_sample(), Err(Error::ModelNotFit)));
        assert!(matches!(model.get_rhat(), Err(Error::ModelNotFit)));
    }
}
