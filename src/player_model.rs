use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VarianceConfig;
use crate::error::Result;
use crate::sampler::{SampleArray, Sampler};
use crate::signals::{Difficulty, FixtureContext, PlayerSignal};
use crate::variance::estimate_spread;

const W_POINTS_PER_GAME: f64 = 0.5;
const W_FORM: f64 = 0.3;
const W_XGI: f64 = 0.2;

/// Mean and spread of one player's points over one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValue {
    pub mean: f64,
    pub spread: f64,
}

impl ExpectedValue {
    pub const ZERO: ExpectedValue = ExpectedValue {
        mean: 0.0,
        spread: 0.0,
    };
}

/// Period projection broken down per fixture, in fixture order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub player_id: u32,
    pub fixture_means: Vec<f64>,
    pub expected: ExpectedValue,
    pub per_fixture_spread: f64,
}

impl PlayerProjection {
    pub fn zero(player_id: u32) -> Self {
        Self {
            player_id,
            fixture_means: Vec::new(),
            expected: ExpectedValue::ZERO,
            per_fixture_spread: 0.0,
        }
    }

    pub fn fixture_count(&self) -> usize {
        self.fixture_means.len()
    }

    /// Draws `n` period totals. Each fixture is sampled separately and clipped
    /// at zero before being summed; a player with no fixtures scores zero.
    pub fn sample(&self, sampler: &mut Sampler, n: usize) -> Result<SampleArray> {
        let mut acc = SampleArray::zeros(n);
        for &fixture_mean in &self.fixture_means {
            sampler.simulate_into(&mut acc, fixture_mean, self.per_fixture_spread)?;
        }
        Ok(acc)
    }
}

/// Weighted blend of season signals before the fixture adjustment.
pub fn base_points(signal: &PlayerSignal) -> f64 {
    let ppg = signal.points_per_game.unwrap_or(0.0);
    let form = signal.form.unwrap_or(ppg);
    let xgi = signal.xgi.unwrap_or(0.0);
    W_POINTS_PER_GAME * ppg + W_FORM * form + W_XGI * xgi
}

pub fn fixture_expected_points(signal: &PlayerSignal, difficulty: Difficulty) -> f64 {
    (base_points(signal) * difficulty.adjustment()).max(0.0)
}

pub fn project_player(
    signal: &PlayerSignal,
    fixtures: &FixtureContext,
    variance: &VarianceConfig,
) -> PlayerProjection {
    if !signal.status.can_play() || fixtures.is_blank() {
        debug!(
            player_id = signal.id,
            status = ?signal.status,
            fixtures = fixtures.len(),
            "player cannot score this period"
        );
        return PlayerProjection::zero(signal.id);
    }

    let fixture_means: Vec<f64> = fixtures
        .fixtures
        .iter()
        .map(|f| fixture_expected_points(signal, f.difficulty))
        .collect();
    let mean: f64 = fixture_means.iter().sum();
    let spread = estimate_spread(&signal.history, mean, variance);
    let per_fixture_spread = spread / fixture_means.len() as f64;

    debug!(
        player_id = signal.id,
        fixtures = fixture_means.len(),
        mean,
        spread,
        "projected player"
    );

    PlayerProjection {
        player_id: signal.id,
        fixture_means,
        expected: ExpectedValue { mean, spread },
        per_fixture_spread,
    }
}

pub fn expected_value(
    signal: &PlayerSignal,
    fixtures: &FixtureContext,
    variance: &VarianceConfig,
) -> ExpectedValue {
    project_player(signal, fixtures, variance).expected
}

/// Samples a single player for one period from its own stream.
pub fn simulate_player(
    signal: &PlayerSignal,
    fixtures: &FixtureContext,
    variance: &VarianceConfig,
    sampler: &mut Sampler,
    n: usize,
) -> Result<SampleArray> {
    project_player(signal, fixtures, variance).sample(sampler, n)
}
