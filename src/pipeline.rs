//! Fitting every pathogen against every study
//!
//! A fit unit is one predictor set (pathogen, predictor kind, taxid group)
//! paired with one study. Units are independent; they are built and fit on a
//! rayon pool and come back in plan order.

use std::time::Instant;

use indicatif::ParallelProgressIterator;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::mgs::{BioProject, Enrichment, SequencingData, target_bioprojects};
use crate::model::build_model;
use crate::output::{FittedUnit, UnitKey};
use crate::pathogens::{PathogenRegistry, PredictorSet, TaxIds};
use crate::utils::logging::{add_unit_progress_bar, create_fit_progress, finish_progress_bar};

/// One planned fit
#[derive(Debug, Clone)]
pub struct FitTask {
    /// Predictors to match against the study's samples
    pub set: PredictorSet,
    /// Study name
    pub study: &'static str,
    /// Bioprojects of the study
    pub bioprojects: Vec<BioProject>,
    /// Enrichment filter for the study's samples
    pub enrichment: Option<Enrichment>,
}

impl FitTask {
    /// Key of the unit this task produces
    #[must_use]
    pub fn key(&self) -> UnitKey {
        UnitKey {
            pathogen: self.set.pathogen,
            tidy_name: self.set.tidy_name,
            predictor_type: self.set.predictor_type,
            taxids: self.set.taxids.clone(),
            study: self.study,
        }
    }

    /// Seed of the unit's random stream
    #[must_use]
    pub fn random_seed(&self) -> u64 {
        taxid_seed(&self.set.taxids)
    }

    fn label(&self) -> String {
        format!(
            "{} {} / {}",
            self.set.tidy_name, self.set.predictor_type, self.study
        )
    }
}

/// Sum of the taxids, used to seed each unit
#[must_use]
pub fn taxid_seed(taxids: &TaxIds) -> u64 {
    taxids.iter().map(|taxid| u64::from(taxid.0)).sum()
}

/// Every fit the configuration calls for, in output order
pub fn plan(registry: &PathogenRegistry, config: &PipelineConfig) -> Result<Vec<FitTask>> {
    let sets = registry.predictors_by_taxid(config.include_round_2)?;
    let studies = target_bioprojects();

    let mut tasks = Vec::new();
    for set in sets {
        for (study, bioprojects) in &studies {
            let Some(enrichment) = config.mode.enrichment_for(study) else {
                debug!("Skipping {study} in {} mode", config.mode);
                continue;
            };
            tasks.push(FitTask {
                set: set.clone(),
                study: *study,
                bioprojects: bioprojects.clone(),
                enrichment,
            });
        }
    }
    Ok(tasks)
}

/// Build and fit one task
///
/// Returns `Ok(None)` when nothing in the study matches the predictors or
/// the matched rows carry no information.
pub fn fit_task<D: SequencingData + ?Sized>(
    dataset: &D,
    task: &FitTask,
    config: &PipelineConfig,
) -> Result<Option<FittedUnit>> {
    let Some(mut model) = build_model(
        dataset,
        &task.bioprojects,
        &task.set.predictors,
        &task.set.taxids,
        task.random_seed(),
        task.enrichment,
    )?
    else {
        debug!("No matches for {}", task.label());
        return Ok(None);
    };

    match model.fit_with(&config.sampler) {
        Ok(()) => Ok(Some(FittedUnit {
            key: task.key(),
            model,
        })),
        Err(e @ (Error::DegenerateDesign(_) | Error::NonConvergence { .. })) => {
            warn!("Skipping {}: {e}", task.label());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Fit every planned unit in parallel
pub fn run<D: SequencingData + ?Sized>(
    dataset: &D,
    registry: &PathogenRegistry,
    config: &PipelineConfig,
) -> Result<Vec<FittedUnit>> {
    config.validate()?;
    let tasks = plan(registry, config)?;
    info!(
        "Fitting {} units on {} threads in {} mode",
        tasks.len(),
        config.threads,
        config.mode
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| Error::Config(format!("cannot start worker pool: {e}")))?;

    let start = Instant::now();
    let (mp, main) = create_fit_progress(tasks.len() as u64, config.show_progress);
    let results: Vec<Option<FittedUnit>> = pool.install(|| {
        tasks
            .par_iter()
            .progress_with(main.clone())
            .map(|task| {
                let pb = add_unit_progress_bar(&mp, &task.label());
                let unit = fit_task(dataset, task, config);
                pb.finish_and_clear();
                unit
            })
            .collect::<Result<Vec<_>>>()
    })?;
    finish_progress_bar(&main, Some("done"));

    let units: Vec<FittedUnit> = results.into_iter().flatten().collect();
    info!(
        "Fit {} of {} units in {:?}",
        units.len(),
        tasks.len(),
        start.elapsed()
    );
    Ok(units)
}
