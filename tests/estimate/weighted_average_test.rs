#[cfg(test)]
mod tests {
    use p2ra::error::VariableError;
    use p2ra::estimate::{Active, Estimate, IncidenceRate, Population, Prevalence, Scalar};
    use p2ra::variable::Variable;

    fn in_county(county: &str) -> Variable {
        Variable::builder()
            .country("United States")
            .state("Ohio")
            .county(county)
            .date("2020")
            .build()
            .unwrap()
    }

    fn ohio(date: &str) -> Variable {
        Variable::builder()
            .country("United States")
            .state("Ohio")
            .date(date)
            .build()
            .unwrap()
    }

    #[test]
    fn test_population_weighted_mean() {
        let pairs: Vec<(Prevalence, Population)> = (1..=4)
            .map(|i| {
                let date = format!("2020-0{i}");
                (
                    Prevalence::new(f64::from(i), Active::Active, ohio(&date)),
                    Population::new(100_000.0 * f64::from(i), ohio("2020")),
                )
            })
            .collect();

        let average = Prevalence::weighted_average_by_population(&pairs).unwrap();
        // (1·1 + 2·2 + 3·3 + 4·4) / (1 + 2 + 3 + 4)
        assert!((average.infections_per_100k - 3.0).abs() < 1e-12);
        assert_eq!(average.variable.summarize_location(), "Ohio, United States");
        assert_eq!(average.variable.inputs().len(), 8);
    }

    #[test]
    fn test_empty_aggregate() {
        let pairs: [(IncidenceRate, Population); 0] = [];
        assert_eq!(
            IncidenceRate::weighted_average_by_population(&pairs),
            Err(VariableError::EmptyAggregate)
        );
    }

    #[test]
    fn test_conflicting_locations() {
        let pairs = [
            (
                Prevalence::new(1.0, Active::Active, in_county("Franklin County")),
                Population::new(1_000.0, in_county("Franklin County")),
            ),
            (
                Prevalence::new(2.0, Active::Active, in_county("Hamilton County")),
                Population::new(1_000.0, in_county("Hamilton County")),
            ),
        ];
        assert!(matches!(
            Prevalence::weighted_average_by_population(&pairs),
            Err(VariableError::ConflictingLocation(_, _))
        ));
    }

    #[test]
    fn test_target_keeps_value_and_provenance() {
        let scalar = Scalar::new(0.5, ohio("2020"));
        let moved = scalar
            .target(Variable::builder().country("United States").date("2021"))
            .unwrap();
        assert_eq!(moved.scalar, 0.5);
        assert_eq!(moved.variable.summarize_location(), "United States");
        assert_eq!(moved.variable.summarize_date(), "2021-01-01 to 2021-12-31");
        assert_eq!(moved.variable.inputs().len(), 1);
    }

    #[test]
    fn test_scaling_combines_provenance() {
        let prevalence = Prevalence::new(200.0, Active::Active, ohio("2020"));
        let factor = Scalar::new(1.5, Variable::builder().build().unwrap());
        let scaled = (&prevalence * &factor).unwrap();
        assert_eq!(scaled.infections_per_100k, 300.0);
        assert_eq!(scaled.variable.summarize_location(), "Ohio, United States");
        assert_eq!(scaled.variable.inputs().len(), 2);
    }
}
