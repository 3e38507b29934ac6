//! Markov chain Monte Carlo for the hierarchical read-count model
//!
//! Viral reads of sample `i` at location `l` are negative binomial with mean
//!
//! ```text
//! mu_i = total_reads_i * (predictor_i / 1000) * theta_l
//! log theta_l = b + sigma * z_l
//! ```
//!
//! and dispersion `phi`. Priors: `b ~ N(-15, 10)`, `sigma ~ HalfNormal(1)`,
//! `log phi ~ N(0, 2.5)`, `z_l ~ N(0, 1)`. `sigma` is sampled on the log
//! scale with the Jacobian folded into its prior.
//!
//! Sampling is component-wise random-walk Metropolis. `b` and `sigma` are
//! tied to every `z_l` through `log theta_l`, so each sweep ends with two
//! joint moves along those ridges: `b` shifted by `delta` with every `z_l`
//! shifted by `-delta / sigma`, and `log sigma` shifted by `delta` with every
//! `z_l` scaled by `exp(-delta)`. Both leave `theta` unchanged up to rounding.
//! Step sizes adapt in batches during warm-up towards an acceptance rate of
//! 0.44 and are frozen afterwards. Each chain owns a `StdRng` seeded from the model seed plus the
//! chain index, so a fit is reproducible from its seed.

use log::debug;
use rand::prelude::*;
use rand_distr::StandardNormal;
use statrs::function::gamma::ln_gamma;

use crate::error::{Error, Result};

/// Index of `b` in a parameter vector
pub const B: usize = 0;
/// Index of `log sigma`
pub const LOG_SIGMA: usize = 1;
/// Index of `log phi`
pub const LOG_PHI: usize = 2;
/// Index of `z_0`; location `l` lives at `Z0 + l`
pub const Z0: usize = 3;

const PRIOR_B_MEAN: f64 = -15.0;
const PRIOR_B_SD: f64 = 10.0;
const PRIOR_LOG_PHI_SD: f64 = 2.5;

/// Sampler configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Draws kept per chain
    pub num_samples: usize,
    /// Number of chains
    pub num_chains: usize,
    /// Warm-up iterations per chain; `None` means the same as `num_samples`
    pub warmup: Option<usize>,
    /// Acceptance rate step sizes adapt towards
    pub target_acceptance: f64,
    /// Iterations between step size updates during warm-up
    pub adaptation_batch: usize,
    /// Starting random-walk step size on every parameter
    pub initial_step: f64,
    /// Largest acceptable split R-hat
    pub max_rhat: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            num_chains: 4,
            warmup: None,
            target_acceptance: 0.44,
            adaptation_batch: 50,
            initial_step: 0.1,
            max_rhat: 1.1,
        }
    }
}

impl SamplerConfig {
    /// Create a new builder for constructing a sampler configuration
    #[must_use]
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::new()
    }

    /// Warm-up iterations per chain
    #[must_use]
    pub fn warmup_iterations(&self) -> usize {
        self.warmup.unwrap_or(self.num_samples)
    }

    /// Reject configurations the sampler cannot run
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::Config("num_samples must be at least 1".to_string()));
        }
        if self.num_chains == 0 {
            return Err(Error::Config("num_chains must be at least 1".to_string()));
        }
        if self.adaptation_batch == 0 {
            return Err(Error::Config("adaptation_batch must be at least 1".to_string()));
        }
        if !(self.target_acceptance > 0.0 && self.target_acceptance < 1.0) {
            return Err(Error::Config(format!(
                "target_acceptance must lie in (0, 1), got {}",
                self.target_acceptance
            )));
        }
        if !(self.initial_step > 0.0 && self.initial_step.is_finite()) {
            return Err(Error::Config(format!(
                "initial_step must be positive, got {}",
                self.initial_step
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a sampler configuration
#[derive(Debug, Clone, Default)]
pub struct SamplerConfigBuilder {
    config: SamplerConfig,
}

impl SamplerConfigBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::default(),
        }
    }

    /// Set the number of draws kept per chain
    #[must_use]
    pub const fn num_samples(mut self, num_samples: usize) -> Self {
        self.config.num_samples = num_samples;
        self
    }

    /// Set the number of chains
    #[must_use]
    pub const fn num_chains(mut self, num_chains: usize) -> Self {
        self.config.num_chains = num_chains;
        self
    }

    /// Set the warm-up length
    #[must_use]
    pub const fn warmup(mut self, warmup: usize) -> Self {
        self.config.warmup = Some(warmup);
        self
    }

    /// Set the target acceptance rate
    #[must_use]
    pub const fn target_acceptance(mut self, rate: f64) -> Self {
        self.config.target_acceptance = rate;
        self
    }

    /// Set the adaptation batch length
    #[must_use]
    pub const fn adaptation_batch(mut self, batch: usize) -> Self {
        self.config.adaptation_batch = batch;
        self
    }

    /// Set the starting step size
    #[must_use]
    pub const fn initial_step(mut self, step: f64) -> Self {
        self.config.initial_step = step;
        self
    }

    /// Set the R-hat threshold
    #[must_use]
    pub const fn max_rhat(mut self, max_rhat: f64) -> Self {
        self.config.max_rhat = max_rhat;
        self
    }

    /// Build the sampler configuration
    #[must_use]
    pub fn build(self) -> SamplerConfig {
        self.config
    }
}

/// Observations the sampler conditions on
#[derive(Debug, Clone)]
pub struct Target {
    viral_reads: Vec<f64>,
    ln_factorial: Vec<f64>,
    /// `ln(total_reads) + ln(predictor / 1000)` per observation
    log_exposure: Vec<f64>,
    by_location: Vec<Vec<usize>>,
}

impl Target {
    /// Build a target from per-observation reads, exposures and location indices
    ///
    /// `exposure` is `total_reads * predictor / 1000` and must be positive.
    pub fn new(
        viral_reads: &[u64],
        exposure: &[f64],
        location: &[usize],
        num_locations: usize,
    ) -> Result<Self> {
        if viral_reads.len() != exposure.len() || viral_reads.len() != location.len() {
            return Err(Error::DegenerateDesign(
                "observation columns differ in length".to_string(),
            ));
        }
        if viral_reads.is_empty() {
            return Err(Error::DegenerateDesign("no observations".to_string()));
        }
        if let Some(bad) = exposure.iter().find(|e| !(**e > 0.0 && e.is_finite())) {
            return Err(Error::DegenerateDesign(format!(
                "exposure must be positive, got {bad}"
            )));
        }

        let mut by_location = vec![Vec::new(); num_locations];
        for (i, &l) in location.iter().enumerate() {
            let rows = by_location.get_mut(l).ok_or_else(|| {
                Error::DegenerateDesign(format!("location index {l} out of range"))
            })?;
            rows.push(i);
        }

        let viral_reads: Vec<f64> = viral_reads.iter().map(|&y| y as f64).collect();
        Ok(Self {
            ln_factorial: viral_reads.iter().map(|y| ln_gamma(y + 1.0)).collect(),
            viral_reads,
            log_exposure: exposure.iter().map(|e| e.ln()).collect(),
            by_location,
        })
    }

    /// Number of locations
    #[must_use]
    pub fn num_locations(&self) -> usize {
        self.by_location.len()
    }

    /// Length of a parameter vector
    #[must_use]
    pub fn dimension(&self) -> usize {
        Z0 + self.num_locations()
    }

    /// Log prior density
    #[must_use]
    pub fn log_prior(&self, params: &[f64]) -> f64 {
        let b = (params[B] - PRIOR_B_MEAN) / PRIOR_B_SD;
        let sigma = params[LOG_SIGMA].exp();
        let log_phi = params[LOG_PHI] / PRIOR_LOG_PHI_SD;
        let z: f64 = params[Z0..].iter().map(|z| z * z).sum();
        -0.5 * (b * b + sigma * sigma + log_phi * log_phi + z) + params[LOG_SIGMA]
    }

    /// Log likelihood of the observations at one location
    #[must_use]
    pub fn log_likelihood_at(&self, params: &[f64], location: usize) -> f64 {
        let log_phi = params[LOG_PHI];
        let phi = log_phi.exp();
        let ln_gamma_phi = ln_gamma(phi);
        let log_theta = log_theta(params, location);

        self.by_location[location]
            .iter()
            .map(|&i| {
                let y = self.viral_reads[i];
                let log_mu = self.log_exposure[i] + log_theta;
                let log_denominator = log_add_exp(log_phi, log_mu);
                ln_gamma(y + phi) - ln_gamma_phi - self.ln_factorial[i]
                    + phi * (log_phi - log_denominator)
                    + y * (log_mu - log_denominator)
            })
            .sum()
    }

    /// Log likelihood at every location
    #[must_use]
    pub fn log_likelihoods(&self, params: &[f64]) -> Vec<f64> {
        (0..self.num_locations())
            .map(|l| self.log_likelihood_at(params, l))
            .collect()
    }

    /// Expected viral reads of observation `i` under `params`
    #[must_use]
    pub fn expected_reads(&self, params: &[f64], i: usize, location: usize) -> f64 {
        (self.log_exposure[i] + log_theta(params, location)).exp()
    }

    fn initial_point(&self, rng: &mut StdRng) -> Vec<f64> {
        let observed: f64 = self.viral_reads.iter().sum();
        let exposure: f64 = self.log_exposure.iter().map(|e| e.exp()).sum();
        let b = ((observed + 0.5) / exposure).ln();

        let mut params = vec![0.0; self.dimension()];
        params[B] = b;
        params[LOG_SIGMA] = 0.5_f64.ln();
        for value in &mut params {
            let jitter: f64 = rng.sample(StandardNormal);
            *value += 0.1 * jitter;
        }
        params
    }
}

/// `b + sigma * z_l`
#[must_use]
pub fn log_theta(params: &[f64], location: usize) -> f64 {
    params[B] + params[LOG_SIGMA].exp() * params[Z0 + location]
}

fn log_add_exp(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    max + ((a - max).exp() + (b - max).exp()).ln()
}

/// Kept draws of one chain, one parameter vector per draw
pub type ChainDraws = Vec<Vec<f64>>;

/// Joint moves that keep every `theta_l` in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ridge {
    /// `b + delta`, `z_l - delta / sigma`
    Shift,
    /// `log sigma + delta`, `z_l * exp(-delta)`
    Scale,
}

impl Ridge {
    const ALL: [Self; 2] = [Self::Shift, Self::Scale];

    /// Move `params` by `delta`, returning the log Jacobian of the map
    fn apply(self, params: &mut [f64], delta: f64) -> f64 {
        match self {
            Self::Shift => {
                let sigma = params[LOG_SIGMA].exp();
                params[B] += delta;
                params[Z0..].iter_mut().for_each(|z| *z -= delta / sigma);
                0.0
            }
            Self::Scale => {
                params[LOG_SIGMA] += delta;
                let factor = (-delta).exp();
                params[Z0..].iter_mut().for_each(|z| *z *= factor);
                -delta * (params.len() - Z0) as f64
            }
        }
    }
}

/// State of one chain between proposals
struct Chain<'a> {
    target: &'a Target,
    rng: StdRng,
    params: Vec<f64>,
    prior: f64,
    likelihoods: Vec<f64>,
}

impl Chain<'_> {
    fn accept(&mut self, log_ratio: f64) -> bool {
        let u: f64 = self.rng.random();
        log_ratio.is_finite() && u.ln() < log_ratio
    }

    /// Random-walk update of coordinate `k`
    fn step_component(&mut self, k: usize, step: f64) -> bool {
        let previous = self.params[k];
        let noise: f64 = self.rng.sample(StandardNormal);
        self.params[k] = previous + step * noise;

        let proposed_prior = self.target.log_prior(&self.params);
        if k >= Z0 {
            let location = k - Z0;
            let proposed = self.target.log_likelihood_at(&self.params, location);
            let log_ratio = proposed_prior - self.prior + proposed - self.likelihoods[location];
            if self.accept(log_ratio) {
                self.prior = proposed_prior;
                self.likelihoods[location] = proposed;
                return true;
            }
        } else {
            let proposed = self.target.log_likelihoods(&self.params);
            let change = proposed.iter().sum::<f64>() - self.likelihoods.iter().sum::<f64>();
            let log_ratio = proposed_prior - self.prior + change;
            if self.accept(log_ratio) {
                self.prior = proposed_prior;
                self.likelihoods = proposed;
                return true;
            }
        }
        self.params[k] = previous;
        false
    }

    /// Update along a ridge of constant `theta`
    fn step_ridge(&mut self, ridge: Ridge, step: f64) -> bool {
        let noise: f64 = self.rng.sample(StandardNormal);
        let mut proposal = self.params.clone();
        let log_jacobian = ridge.apply(&mut proposal, step * noise);

        let proposed_prior = self.target.log_prior(&proposal);
        let proposed = self.target.log_likelihoods(&proposal);
        let change = proposed.iter().sum::<f64>() - self.likelihoods.iter().sum::<f64>();
        let log_ratio = proposed_prior - self.prior + change + log_jacobian;
        if self.accept(log_ratio) {
            self.params = proposal;
            self.prior = proposed_prior;
            self.likelihoods = proposed;
            true
        } else {
            false
        }
    }
}

/// Run one chain
pub fn run_chain(target: &Target, config: &SamplerConfig, seed: u64) -> Result<ChainDraws> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dimension = target.dimension();

    let params = target.initial_point(&mut rng);
    let prior = target.log_prior(&params);
    let likelihoods = target.log_likelihoods(&params);
    if !(prior + likelihoods.iter().sum::<f64>()).is_finite() {
        return Err(Error::NonFinitePosterior(format!(
            "log posterior at initial point {params:?} is not finite"
        )));
    }
    let mut chain = Chain {
        target,
        rng,
        params,
        prior,
        likelihoods,
    };

    // One step size per coordinate, then one per ridge move
    let moves = dimension + Ridge::ALL.len();
    let warmup = config.warmup_iterations();
    let mut steps = vec![config.initial_step; moves];
    let mut accepted = vec![0usize; moves];
    let mut batches = 0usize;
    let mut draws = Vec::with_capacity(config.num_samples);

    for iteration in 0..warmup + config.num_samples {
        for k in 0..dimension {
            if chain.step_component(k, steps[k]) {
                accepted[k] += 1;
            }
        }
        for (offset, ridge) in Ridge::ALL.into_iter().enumerate() {
            let m = dimension + offset;
            if chain.step_ridge(ridge, steps[m]) {
                accepted[m] += 1;
            }
        }

        if iteration < warmup && (iteration + 1) % config.adaptation_batch == 0 {
            batches += 1;
            let scale = 1.0 / (batches as f64).sqrt();
            for (step, count) in steps.iter_mut().zip(accepted.iter_mut()) {
                let rate = *count as f64 / config.adaptation_batch as f64;
                *step *= (2.0 * scale * (rate - config.target_acceptance)).exp();
                *count = 0;
            }
        }
        if iteration + 1 == warmup {
            accepted.iter_mut().for_each(|count| *count = 0);
        }
        if iteration >= warmup {
            draws.push(chain.params.clone());
        }
    }

    debug!(
        "Chain with seed {seed} finished: acceptance {:?}",
        accepted
            .iter()
            .map(|&count| count as f64 / config.num_samples as f64)
            .collect::<Vec<_>>()
    );
    Ok(draws)
}
