#[cfg(test)]
mod tests {
    use p2ra::error::VariableError;
    use p2ra::matching::{Matcher, MatchingCriteria, match_quality};
    use p2ra::variable::{Variable, VariableBuilder};

    use crate::common::allegheny_sample;

    fn us() -> VariableBuilder {
        Variable::builder().country("United States")
    }

    fn score(builder: VariableBuilder) -> Option<i64> {
        let variable = builder.build().unwrap();
        match_quality(&allegheny_sample(), &variable).unwrap()
    }

    #[test]
    fn test_country_and_covering_dates_score_zero() {
        assert_eq!(score(us().date("2019")), Some(0));
        assert_eq!(score(us().date("2019-05-14")), Some(0));
        assert_eq!(score(us().start_date("2019-05-01").end_date("2019-06-02")), Some(0));
    }

    #[test]
    fn test_each_day_off_costs_one() {
        assert_eq!(score(us().date("2019-05-15")), Some(-1));
        assert_eq!(score(us().date("2019-05-07")), Some(-7));
        assert_eq!(score(us().date("2019-05-21")), Some(-7));
    }

    #[test]
    fn test_eight_days_off_is_rejected() {
        assert_eq!(score(us().date("2019-05-22")), None);
        assert_eq!(score(us().date("2019-05-06")), None);
        assert_eq!(
            score(us().start_date("2019-05-15").end_date("2019-05-22")),
            Some(-1)
        );
    }

    #[test]
    fn test_month_off_is_rejected() {
        assert_eq!(score(us().date("2019-06-14")), None);
        assert_eq!(score(us().date("2019-04-13")), None);
    }

    #[test]
    fn test_dates_beyond_tolerance_are_rejected() {
        // 17 days after the sample
        assert_eq!(score(us().date("2019-05-31")), None);
        assert_eq!(score(us().date("2018")), None);
        assert_eq!(score(us().date("2019-04")), None);
    }

    #[test]
    fn test_specific_locations_earn_bonuses() {
        assert_eq!(score(us().state("Pennsylvania").date("2019")), Some(10));
        assert_eq!(
            score(us().state("Pennsylvania").county("Allegheny County").date("2019")),
            Some(30)
        );
    }

    #[test]
    fn test_other_places_are_rejected() {
        assert_eq!(
            score(us().state("Pennsylvania").county("Beaver County").date("2019")),
            None
        );
        assert_eq!(score(us().state("Ohio").date("2019")), None);
        assert_eq!(score(Variable::builder().country("Denmark").date("2019")), None);
    }

    #[test]
    fn test_undated_candidate_fails() {
        let variable = us().build().unwrap();
        assert_eq!(
            match_quality(&allegheny_sample(), &variable),
            Err(VariableError::DatesUnset)
        );
    }

    #[test]
    fn test_custom_tolerance() {
        let matcher = Matcher::new(MatchingCriteria::builder().date_tolerance_days(30).build());
        let variable = us().date("2019-05-31").build().unwrap();
        assert_eq!(
            matcher.match_quality(&allegheny_sample(), &variable),
            Ok(Some(-17))
        );
    }
}
