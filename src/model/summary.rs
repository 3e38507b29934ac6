//! Descriptive statistics of posterior draws

/// Percentiles reported for every posterior summary
pub const PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

/// Summary of a set of draws
///
/// `std` uses the sample (n - 1) denominator and is NaN for fewer than two
/// draws. Percentiles interpolate linearly between order statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Number of draws
    pub count: usize,
    /// Mean
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    /// Smallest draw
    pub min: f64,
    /// 5th percentile
    pub p5: f64,
    /// 25th percentile
    pub p25: f64,
    /// Median
    pub p50: f64,
    /// 75th percentile
    pub p75: f64,
    /// 95th percentile
    pub p95: f64,
    /// Largest draw
    pub max: f64,
}

impl SummaryStats {
    /// Summarize draws; `None` when there are none
    #[must_use]
    pub fn describe(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };
        let [p5, p25, p50, p75, p95] = PERCENTILES.map(|q| quantile_sorted(&sorted, q));

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p5,
            p25,
            p50,
            p75,
            p95,
            max: sorted[count - 1],
        })
    }

    /// Values in output column order: mean, std, min, 5%, 25%, 50%, 75%, 95%, max
    #[must_use]
    pub const fn columns(&self) -> [f64; 9] {
        [
            self.mean, self.std, self.min, self.p5, self.p25, self.p50, self.p75, self.p95,
            self.max,
        ]
    }
}

/// Linearly interpolated quantile of an ascending slice
///
/// # Panics
/// Panics if `sorted` is empty.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
