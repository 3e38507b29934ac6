use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use p2ra::config::{FitMode, PipelineConfig};
use p2ra::mgs::MgsData;
use p2ra::pathogens::PathogenRegistry;
use p2ra::{output, pipeline};

/// Fit relative abundance against literature prevalence and incidence
#[derive(Parser, Debug)]
#[command(name = "p2ra")]
#[command(version)]
struct Args {
    /// Directory holding the sequencing metadata snapshot
    mgs_dir: PathBuf,

    /// Directory holding the census and NORS tables
    catalog_dir: PathBuf,

    /// Directory the output tables are written to
    output_dir: PathBuf,

    /// Fit panel-enriched samples instead of viral-enriched ones
    #[arg(long)]
    panel: bool,

    /// Also fit pathogens selected in the second round
    #[arg(long = "round-2")]
    round_2: bool,

    /// Posterior draws kept per chain
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Number of chains
    #[arg(long, default_value_t = 4)]
    chains: usize,

    /// Worker threads; defaults to the number of logical CPUs
    #[arg(long)]
    threads: Option<usize>,

    /// Hide progress bars
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        let mut builder = PipelineConfig::builder()
            .num_samples(self.samples)
            .num_chains(self.chains)
            .include_round_2(self.round_2)
            .show_progress(!self.no_progress);
        if self.panel {
            builder = builder.mode(FitMode::Panel);
        }
        if let Some(threads) = self.threads {
            builder = builder.threads(threads);
        }
        builder.build()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();
    let start = Instant::now();

    let dataset = MgsData::from_dir(&args.mgs_dir).context("loading sequencing snapshot")?;
    let registry = PathogenRegistry::load(&args.catalog_dir).context("loading pathogen catalog")?;
    registry.validate().context("validating pathogen catalog")?;

    let units = pipeline::run(&dataset, &registry, &config)?;
    output::write_all(&args.output_dir, &config, &units)
        .with_context(|| format!("writing results to {}", args.output_dir.display()))?;

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
