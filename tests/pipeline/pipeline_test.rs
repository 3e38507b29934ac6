#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use p2ra::config::{FitMode, PipelineConfig};
    use p2ra::estimate::PredictorType;
    use p2ra::output;
    use p2ra::pathogens::PathogenRegistry;
    use p2ra::pathogens::registry::{CENSUS_FILE, NORS_FILE};
    use p2ra::pipeline;

    use crate::common::la_dataset;

    fn registry() -> PathogenRegistry {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        PathogenRegistry::load(dir.path()).unwrap()
    }

    fn write_catalog(dir: &Path) {
        fs::write(
            dir.join(CENSUS_FILE),
            "state\tcounty\tyear\tpeople\nCalifornia\tLos Angeles County\t2020\t10014009\n",
        )
        .unwrap();
        fs::write(
            dir.join(NORS_FILE),
            "Year\tMonth\tEtiology\n2017\t3\tNorovirus GII\n",
        )
        .unwrap();
    }

    fn config(mode: FitMode) -> PipelineConfig {
        PipelineConfig::builder()
            .num_samples(10)
            .num_chains(1)
            .threads(2)
            .mode(mode)
            .show_progress(false)
            .build()
    }

    #[test]
    fn test_only_matching_units_are_fit() {
        let units = pipeline::run(&la_dataset(), &registry(), &config(FitMode::Standard)).unwrap();
        assert_eq!(units.len(), 1);

        let key = &units[0].key;
        assert_eq!(key.pathogen, "rhinovirus");
        assert_eq!(key.study, "rothman");
        assert_eq!(key.predictor_type, PredictorType::Prevalence);
        assert_eq!(units[0].model.random_seed(), 147_711 + 147_712 + 463_676);
        assert_eq!(units[0].model.input_rows().len(), 3);
    }

    #[test]
    fn test_panel_mode_writes_prefixed_tables() {
        let config = config(FitMode::Panel);
        let units = pipeline::run(&la_dataset(), &registry(), &config).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].model.input_rows().len(), 1);

        let out = tempfile::tempdir().unwrap();
        output::write_all(out.path(), &config, &units).unwrap();
        for table in ["panel_input.tsv", "panel_fits.tsv", "panel_fits_summary.tsv"] {
            assert!(out.path().join(table).exists(), "{table} missing");
        }
        let summary = fs::read_to_string(out.path().join("panel_fits_summary.tsv")).unwrap();
        // header, JWPCP and Overall
        assert_eq!(summary.lines().count(), 3);
    }

    #[test]
    fn test_invalid_config_fails_before_fitting() {
        let config = PipelineConfig::builder().threads(0).build();
        assert!(pipeline::run(&la_dataset(), &registry(), &config).is_err());
    }
}
