#[cfg(test)]
mod tests {
    use p2ra::error::VariableError;
    use p2ra::variable::{Location, Variable};

    use crate::common::ymd;

    #[test]
    fn test_date_forms() {
        let year = Variable::builder().date("2020").build().unwrap();
        assert_eq!(year.get_dates(), Ok((ymd(2020, 1, 1), ymd(2020, 12, 31))));

        let month = Variable::builder().date("2020-02").build().unwrap();
        assert_eq!(month.get_dates(), Ok((ymd(2020, 2, 1), ymd(2020, 2, 29))));

        let range = Variable::builder()
            .start_date("2020-01")
            .end_date("2020-03-15")
            .build()
            .unwrap();
        assert_eq!(range.get_dates(), Ok((ymd(2020, 1, 1), ymd(2020, 3, 15))));
    }

    #[test]
    fn test_invalid_date_strings() {
        for bad in ["2020-1", "2020/01/01", "20", "2020-13", "2021-02-29", ""] {
            assert!(
                matches!(
                    Variable::builder().date(bad).build(),
                    Err(VariableError::InvalidDateFormat(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_date_form_errors() {
        assert_eq!(
            Variable::builder()
                .date("2020")
                .start_date("2020-01-01")
                .end_date("2020-02-01")
                .build(),
            Err(VariableError::ConflictingDates)
        );
        assert_eq!(
            Variable::builder().start_date("2020-01-01").build(),
            Err(VariableError::IncompleteDateRange)
        );
        assert!(matches!(
            Variable::builder()
                .start_date("2020-02-01")
                .end_date("2020-01-01")
                .build(),
            Err(VariableError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_single_date_access() {
        let day = Variable::builder().date("2019-05-14").build().unwrap();
        assert_eq!(day.get_date(), Ok(ymd(2019, 5, 14)));

        let year = Variable::builder().date("2019").build().unwrap();
        assert!(matches!(
            year.get_date(),
            Err(VariableError::NotSingleDate { .. })
        ));

        let undated = Variable::builder().build().unwrap();
        assert_eq!(undated.get_date(), Err(VariableError::DatesUnset));
        assert_eq!(undated.summarize_date(), "Unspecified");
    }

    #[test]
    fn test_location_hierarchy() {
        assert!(matches!(
            Variable::builder().state("Ohio").build(),
            Err(VariableError::BrokenLocationHierarchy(_))
        ));
        assert!(matches!(
            Variable::builder()
                .country("United States")
                .county("Franklin County")
                .build(),
            Err(VariableError::BrokenLocationHierarchy(_))
        ));

        let county = Variable::builder()
            .country("United States")
            .state("Ohio")
            .county("Franklin County")
            .build()
            .unwrap();
        assert_eq!(
            county.summarize_location(),
            "Franklin County, Ohio, United States"
        );
        assert_eq!(county.get_location().unwrap().county_name(), Some("Franklin County"));

        let nowhere = Variable::builder().build().unwrap();
        assert_eq!(nowhere.get_location(), Err(VariableError::LocationUnset));
        assert_eq!(nowhere.summarize_location(), "Unspecified");
    }

    #[test]
    fn test_conflicting_inputs_need_a_location_source() {
        let denmark = Variable::builder().country("Denmark").date("2015").build().unwrap();
        let swiss = Variable::builder()
            .country("Switzerland")
            .date("2009")
            .build()
            .unwrap();

        assert!(matches!(
            Variable::combine(&swiss, &denmark),
            Err(VariableError::ConflictingLocation(_, _))
        ));

        let resolved = Variable::builder()
            .inputs([swiss.clone(), denmark.clone()])
            .location_source(denmark.clone())
            .build()
            .unwrap();
        assert_eq!(resolved.location(), &Location::country("Denmark"));
        assert_eq!(resolved.get_dates(), Ok((ymd(2009, 1, 1), ymd(2015, 12, 31))));
    }

    #[test]
    fn test_date_source_overrides_inputs() {
        let study = Variable::builder()
            .country("Switzerland")
            .date("2009")
            .source("serosurvey")
            .build()
            .unwrap();
        let recent = Variable::builder()
            .start_date("2015")
            .end_date("2018")
            .source("extrapolation window")
            .build()
            .unwrap();

        let extrapolated = Variable::builder()
            .input(study)
            .date_source(recent.clone())
            .build()
            .unwrap();
        assert_eq!(
            extrapolated.get_dates(),
            Ok((ymd(2015, 1, 1), ymd(2018, 12, 31)))
        );
        assert_eq!(extrapolated.summarize_location(), "Switzerland");
        assert_eq!(extrapolated.date_source(), Some(&recent));
        assert_eq!(extrapolated.all_sources(), ["serosurvey"]);
    }
}
