use crate::config::VarianceConfig;

/// Per-period spread of a player's points.
///
/// With at least `min_history` observations this is the population standard
/// deviation of `history`; otherwise a fixed fraction of `fallback_mean`.
pub fn estimate_spread(history: &[f64], fallback_mean: f64, cfg: &VarianceConfig) -> f64 {
    if history.len() >= cfg.min_history.max(1) {
        return population_std(history);
    }
    (cfg.fallback_multiplier * fallback_mean).max(0.0)
}

fn population_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}
