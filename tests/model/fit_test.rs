#[cfg(test)]
mod tests {
    use p2ra::estimate::{Active, Predictor, Prevalence};
    use chrono::NaiveDate;
    use smallvec::smallvec;

    use p2ra::mgs::{BioProject, Enrichment, Sample};
    use p2ra::model::{InputRow, Model, OVERALL, SamplerConfig, build_model};
    use p2ra::pathogens::TaxIds;
    use p2ra::variable::Variable;

    use crate::common::{FIXTURE_TAXID, ROTHMAN, la_dataset};

    fn model(seed: u64) -> Model {
        let variable = Variable::builder()
            .country("United States")
            .state("California")
            .county("Los Angeles County")
            .date("2020-09")
            .build()
            .unwrap();
        let predictor = Predictor::from(Prevalence::new(500.0, Active::Active, variable));
        build_model(
            &la_dataset(),
            &[BioProject::from(ROTHMAN)],
            &[predictor],
            &TaxIds::from([FIXTURE_TAXID]),
            seed,
            Some(Enrichment::Viral),
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_single_draw_fit() {
        let mut model = model(1);
        model.fit_model(1, 1).unwrap();
        assert!(model.is_fit());

        let coefficients = model.get_coefficients().unwrap();
        let locations: Vec<_> = coefficients.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(locations, ["HTP", "JWPCP", OVERALL]);
        assert!(coefficients.iter().all(|c| c.draws.len() == 1));
        assert_eq!(model.get_output_by_sample().unwrap().len(), 3);
    }

    #[test]
    fn test_multi_chain_fit_reports_rhat() {
        let config = SamplerConfig::builder()
            .num_samples(50)
            .num_chains(2)
            .max_rhat(f64::INFINITY)
            .build();
        let mut model = model(7);
        model.fit_with(&config).unwrap();

        let rhat = model.get_rhat().unwrap();
        let names: Vec<_> = rhat.keys().map(String::as_str).collect();
        assert_eq!(names, ["b", "phi", "sigma", "theta[HTP]", "theta[JWPCP]"]);

        let coefficients = model.get_coefficients().unwrap();
        assert!(coefficients.iter().all(|c| c.draws.len() == 100));
        assert!(coefficients.iter().all(|c| c.summary.min > 0.0));

        let outputs = model.get_output_by_sample().unwrap();
        assert!(outputs.iter().all(|o| o.expected_reads.mean >= 0.0));
        assert_eq!(outputs[1].viral_reads, 30);
    }

    #[test]
    fn test_fit_is_reproducible() {
        let config = SamplerConfig::builder()
            .num_samples(20)
            .num_chains(2)
            .max_rhat(f64::INFINITY)
            .build();
        let mut a = model(42);
        let mut b = model(42);
        a.fit_with(&config).unwrap();
        b.fit_with(&config).unwrap();
        assert_eq!(a, b);

        let mut c = model(43);
        c.fit_with(&config).unwrap();
        assert_ne!(
            a.get_coefficients().unwrap()[0].draws,
            c.get_coefficients().unwrap()[0].draws
        );
    }

    /// Eight locations of twenty samples, abundance around 1e-7
    fn eight_location_model(seed: u64) -> Model {
        let date = NaiveDate::from_ymd_opt(2020, 9, 1).unwrap();
        let mut rows = Vec::new();
        for l in 0..8 {
            let theta = 1e-7 * (0.3 * (f64::from(l) - 3.5)).exp();
            for i in 0..20 {
                let wobble = 0.7 + 0.15 * f64::from(i % 5);
                let mean = 1e8 * theta * wobble;
                rows.push(InputRow {
                    sample: Sample::from(format!("SRR{l}{i:02}").as_str()),
                    bioproject: BioProject::from(ROTHMAN),
                    date,
                    country: "United States".to_string(),
                    state: Some("California".to_string()),
                    county: Some("Los Angeles County".to_string()),
                    location: format!("plant{l}"),
                    fine_location: None,
                    enrichment: Some(Enrichment::Viral),
                    total_reads: 100_000_000,
                    viral_reads: mean.round() as u64,
                    matched: smallvec![1000.0],
                });
            }
        }
        Model::new(rows, seed)
    }

    #[test]
    fn test_many_locations_converge_with_defaults() {
        for seed in [1, 2, 3, 759_099] {
            let mut model = eight_location_model(seed);
            model
                .fit_with(&SamplerConfig::default())
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));

            let rhat = model.get_rhat().unwrap();
            assert_eq!(rhat.len(), 3 + 8);
            assert!(rhat.values().all(|r| *r <= 1.1), "seed {seed}: {rhat:?}");
            let coefficients = model.get_coefficients().unwrap();
            assert_eq!(coefficients.len(), 9);
            assert!(coefficients.iter().all(|c| c.draws.len() == 4000));
        }
    }
}
