//! Bounded-normal sampling. Every simulated universe is one index into a
//! [`SampleArray`]; arrays built for the same run line up index by index.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{EngineError, Result};

/// Non-negative draws, one per simulated universe.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArray(Vec<f64>);

impl SampleArray {
    pub fn zeros(n: usize) -> Self {
        Self(vec![0.0; n])
    }

    /// Wraps precomputed draws. Negative or non-finite values are rejected.
    pub fn from_vec(values: Vec<f64>) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(EngineError::invalid(format!(
                "sample value {bad} is not a non-negative number"
            )));
        }
        Ok(Self(values))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn all_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Elementwise `self += factor * other`. Both arrays must come from the same run.
    pub fn add_scaled(&mut self, other: &[f64], factor: f64) -> Result<()> {
        if other.len() != self.0.len() {
            return Err(EngineError::invalid(format!(
                "sample arrays misaligned: {} vs {}",
                self.0.len(),
                other.len()
            )));
        }
        for (acc, v) in self.0.iter_mut().zip(other) {
            *acc += factor * v;
        }
        Ok(())
    }

    pub fn add(&mut self, other: &SampleArray) -> Result<()> {
        self.add_scaled(&other.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    Fixed(u64),
    Entropy,
}

impl SeedSource {
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map(SeedSource::Fixed).unwrap_or(SeedSource::Entropy)
    }

    /// Pins the seed for one run so every per-player stream derives from it.
    pub fn resolve(self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Entropy => rand::random::<u64>(),
        }
    }
}

pub struct Sampler {
    rng: ChaCha8Rng,
}

impl Sampler {
    pub fn new(seed: SeedSource) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.resolve()),
        }
    }

    /// An independent stream of `seed`. Streams with different indices never
    /// overlap, so slot `k` draws the same values whichever thread runs it.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }

    /// Draws `n` values from Normal(mean, spread), each clipped at zero.
    pub fn simulate(&mut self, mean: f64, spread: f64, n: usize) -> Result<SampleArray> {
        let dist = normal(mean, spread, n)?;
        let out = (0..n)
            .map(|_| dist.sample(&mut self.rng).max(0.0))
            .collect();
        Ok(SampleArray(out))
    }

    /// Like [`Sampler::simulate`] but accumulates into `acc`, one fixture at a time.
    pub fn simulate_into(&mut self, acc: &mut SampleArray, mean: f64, spread: f64) -> Result<()> {
        let dist = normal(mean, spread, acc.len())?;
        for slot in acc.0.iter_mut() {
            *slot += dist.sample(&mut self.rng).max(0.0);
        }
        Ok(())
    }
}

fn normal(mean: f64, spread: f64, n: usize) -> Result<Normal<f64>> {
    if n == 0 {
        return Err(EngineError::invalid("sample count must be at least 1"));
    }
    if !spread.is_finite() || spread < 0.0 {
        return Err(EngineError::invalid(format!(
            "spread must be non-negative, got {spread}"
        )));
    }
    if !mean.is_finite() {
        return Err(EngineError::invalid(format!("mean must be finite, got {mean}")));
    }
    Normal::new(mean, spread).map_err(|e| EngineError::invalid(format!("normal model: {e}")))
}
