#[cfg(test)]
mod tests {
    use p2ra::estimate::Predictor;
    use p2ra::matching::lookup_variables;
    use p2ra::variable::Variable;

    use crate::common::{allegheny_sample, us_prevalence};

    fn us_2019() -> Variable {
        Variable::builder()
            .country("United States")
            .date("2019")
            .build()
            .unwrap()
    }

    #[test]
    fn test_nothing_within_tolerance_finds_nothing() {
        let month_late = Variable::builder()
            .country("United States")
            .date("2019-06-14")
            .build()
            .unwrap();
        let candidates = [month_late];
        let found = lookup_variables(&allegheny_sample(), &candidates).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_ties_are_all_returned() {
        let v1 = us_2019();
        let v2 = Variable::builder()
            .country("United States")
            .date("2019")
            .tag("second")
            .build()
            .unwrap();
        let candidates = [v1.clone(), v2.clone()];
        let found = lookup_variables(&allegheny_sample(), &candidates).unwrap();
        assert_eq!(found, [&v1, &v2]);
    }

    #[test]
    fn test_more_specific_location_wins() {
        let country = us_2019();
        let state = Variable::builder()
            .country("United States")
            .state("Pennsylvania")
            .date("2019")
            .build()
            .unwrap();
        let county = Variable::builder()
            .country("United States")
            .state("Pennsylvania")
            .county("Allegheny County")
            .date("2019")
            .build()
            .unwrap();

        let candidates = [country.clone(), state.clone()];
        assert_eq!(
            lookup_variables(&allegheny_sample(), &candidates).unwrap(),
            [&state]
        );

        let candidates = [county.clone(), country, state];
        assert_eq!(
            lookup_variables(&allegheny_sample(), &candidates).unwrap(),
            [&county]
        );
    }

    #[test]
    fn test_closer_date_wins() {
        let exact = us_prevalence(10.0, "2019-05-14");
        let near = us_prevalence(20.0, "2019-05-16");
        let candidates = [Predictor::from(near), Predictor::from(exact)];
        let found = lookup_variables(&allegheny_sample(), &candidates).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_data(), 10.0);
    }

    #[test]
    fn test_nothing_applicable() {
        let denmark = Variable::builder()
            .country("Denmark")
            .date("2019")
            .build()
            .unwrap();
        assert!(lookup_variables(&allegheny_sample(), &[denmark]).unwrap().is_empty());
        assert!(lookup_variables::<Variable>(&allegheny_sample(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_undated_candidate_is_an_error() {
        let undated = Variable::builder().country("United States").build().unwrap();
        assert!(lookup_variables(&allegheny_sample(), &[us_2019(), undated]).is_err());
    }
}
