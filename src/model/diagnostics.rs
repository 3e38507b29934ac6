//! Convergence diagnostics

/// Smallest number of draws per chain for which split R-hat is computed
pub const MIN_DRAWS_FOR_RHAT: usize = 4;

/// Split R-hat (Gelman-Rubin) of one parameter across chains
///
/// Each chain is cut in half and the halves are treated as separate chains.
/// Returns `None` with fewer than two chains or fewer than
/// [`MIN_DRAWS_FOR_RHAT`] draws in any chain. Identical draws everywhere give
/// 1.0; chains that are individually constant but disagree give infinity.
#[must_use]
pub fn split_rhat(chains: &[Vec<f64>]) -> Option<f64> {
    if chains.len() < 2 || chains.iter().any(|c| c.len() < MIN_DRAWS_FOR_RHAT) {
        return None;
    }
    let half = chains.iter().map(Vec::len).min()? / 2;
    let halves: Vec<&[f64]> = chains
        .iter()
        .flat_map(|chain| [&chain[..half], &chain[chain.len() - half..]])
        .collect();

    let m = halves.len() as f64;
    let n = half as f64;
    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let grand_mean = mean(&means);

    let between = n / (m - 1.0) * means.iter().map(|x| (x - grand_mean).powi(2)).sum::<f64>();
    let within = halves
        .iter()
        .zip(&means)
        .map(|(h, hm)| h.iter().map(|x| (x - hm).powi(2)).sum::<f64>() / (n - 1.0))
        .sum::<f64>()
        / m;

    if within == 0.0 {
        return Some(if between == 0.0 { 1.0 } else { f64::INFINITY });
    }
    let pooled = (n - 1.0) / n * within + between / n;
    Some((pooled / within).sqrt())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
