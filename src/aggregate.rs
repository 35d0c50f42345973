use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::sampler::SampleArray;

/// Summary statistics of a points distribution. Only [`summarize`] builds one,
/// and the statistics are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    expected: f64,
    median: f64,
    p25: f64,
    p75: f64,
    p90: f64,
    #[serde(skip)]
    samples: Option<SampleArray>,
}

impl DistributionSummary {
    pub fn expected(&self) -> f64 {
        self.expected
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn p25(&self) -> f64 {
        self.p25
    }

    pub fn p75(&self) -> f64 {
        self.p75
    }

    pub fn p90(&self) -> f64 {
        self.p90
    }

    pub fn samples(&self) -> Option<&SampleArray> {
        self.samples.as_ref()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "expected": self.expected,
            "median": self.median,
            "p25": self.p25,
            "p75": self.p75,
            "p90": self.p90,
        })
    }
}

pub fn summarize(samples: SampleArray) -> Result<DistributionSummary> {
    if samples.is_empty() {
        return Err(EngineError::invalid("cannot summarize an empty sample array"));
    }
    let mut sorted = samples.as_slice().to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(DistributionSummary {
        expected: samples.mean(),
        median: percentile_sorted(&sorted, 50.0),
        p25: percentile_sorted(&sorted, 25.0),
        p75: percentile_sorted(&sorted, 75.0),
        p90: percentile_sorted(&sorted, 90.0),
        samples: Some(samples),
    })
}

/// Linear interpolation between closest ranks. `sorted` must be ascending and non-empty.
fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    let last = sorted.len().saturating_sub(1);
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * w
}
