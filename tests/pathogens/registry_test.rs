#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use p2ra::error::Error;
    use p2ra::estimate::{Active, Predictor, PredictorType, Prevalence};
    use p2ra::pathogens::registry::{CENSUS_FILE, NORS_FILE, PredictorSet, validate_sets};
    use p2ra::variable::Variable;
    use p2ra::pathogens::{Bkv, PathogenDefinition, PathogenRegistry, TaxId, TaxIds};

    fn write_catalog(dir: &Path) {
        fs::write(
            dir.join(CENSUS_FILE),
            "state\tcounty\tyear\tpeople\n\
             \t\t2020\t331449281\n\
             California\t\t2020\t39538223\n\
             California\tLos Angeles County\t2020\t10014009\n",
        )
        .unwrap();
        fs::write(
            dir.join(NORS_FILE),
            "Year\tMonth\tEtiology\n\
             2015\t1\tNorovirus GII\n\
             2015\t1\tNorovirus GI; Salmonella\n\
             2016\t7\tNorovirus unknown\n\
             2016\t7\tSalmonella enterica\n",
        )
        .unwrap();
    }

    fn load() -> PathogenRegistry {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        PathogenRegistry::load(dir.path()).unwrap()
    }

    #[test]
    fn test_load_and_validate() {
        let registry = load();
        assert_eq!(registry.len(), 3);
        let names: Vec<_> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["bkv", "norovirus", "rhinovirus"]);
        registry.validate().unwrap();
    }

    #[test]
    fn test_round_2_is_opt_in() {
        let registry = load();

        let first_round = registry.predictors_by_taxid(false).unwrap();
        let pathogens: Vec<_> = first_round.iter().map(|s| s.pathogen).collect();
        assert_eq!(pathogens, ["norovirus", "rhinovirus"]);
        assert!(
            first_round
                .iter()
                .all(|s| s.predictor_type == PredictorType::Prevalence && !s.predictors.is_empty())
        );
        assert_eq!(first_round[0].taxids, TaxIds::from([TaxId(142_786)]));
        assert_eq!(first_round[0].predictors.len(), 96);
        assert_eq!(first_round[1].taxids.len(), 3);

        let all = registry.predictors_by_taxid(true).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].pathogen, "bkv");
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = PathogenRegistry::new();
        registry.register(Bkv).unwrap();
        assert_eq!(registry.get("bkv").unwrap().tidy_name(), Bkv.tidy_name());
        assert!(matches!(registry.get("measles"), Err(Error::UnknownPathogen(_))));
        assert!(matches!(registry.register(Bkv), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_missing_county_population() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        fs::write(
            dir.path().join(CENSUS_FILE),
            "state\tcounty\tyear\tpeople\nCalifornia\t\t2020\t39538223\n",
        )
        .unwrap();
        assert!(matches!(
            PathogenRegistry::load(dir.path()),
            Err(Error::MissingPopulation { year: 2020, .. })
        ));
    }

    fn prevalence_set(taxid: u32, months: &[&str]) -> PredictorSet {
        let predictors = months
            .iter()
            .map(|month| {
                let variable = Variable::builder()
                    .country("United States")
                    .state("California")
                    .date(*month)
                    .build()
                    .unwrap();
                Predictor::from(Prevalence::new(100.0, Active::Active, variable))
            })
            .collect();
        PredictorSet {
            pathogen: "norovirus",
            tidy_name: "Norovirus",
            predictor_type: PredictorType::Prevalence,
            taxids: TaxIds::from([TaxId(taxid)]),
            predictors,
        }
    }

    #[test]
    fn test_duplicate_estimates_rejected() {
        let sets = [prevalence_set(122_929, &["2020-01", "2020-01"])];
        assert!(matches!(validate_sets(&sets), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_same_estimate_in_other_taxid_group_accepted() {
        let sets = [
            prevalence_set(122_929, &["2020-01", "2020-02"]),
            prevalence_set(142_786, &["2020-01", "2020-02"]),
        ];
        validate_sets(&sets).unwrap();
    }

    #[test]
    fn test_undated_estimate_rejected() {
        let variable = Variable::builder().country("United States").build().unwrap();
        let mut set = prevalence_set(122_929, &[]);
        set.predictors
            .push(Predictor::from(Prevalence::new(100.0, Active::Active, variable)));
        assert!(matches!(validate_sets(&[set]), Err(Error::Variable(_))));
    }
}
