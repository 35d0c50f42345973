use crate::aggregate::{DistributionSummary, summarize};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::player_model::{PlayerProjection, project_player};
use crate::sampler::{Sampler, SeedSource};
use crate::selection::TeamSelection;
use crate::source::{PlayerSource, resolve_player, resolve_squad};
use crate::team::{simulate_plain, simulate_team};

#[derive(Debug, Clone)]
pub struct PlayerPrediction {
    pub projection: PlayerProjection,
    pub distribution: DistributionSummary,
}

/// Resolves one player for `period` and summarizes its simulated points.
pub fn predict_player<S: PlayerSource + ?Sized>(
    source: &S,
    player_id: u32,
    period: u32,
    cfg: &EngineConfig,
) -> Result<PlayerPrediction> {
    cfg.validate()?;
    let resolved = resolve_player(source, player_id, period, cfg.history_window)?;
    let projection = project_player(&resolved.signal, &resolved.fixtures, &cfg.variance);
    let mut sampler = Sampler::new(SeedSource::from_option(cfg.seed));
    let samples = projection.sample(&mut sampler, cfg.n_sims)?;
    Ok(PlayerPrediction {
        projection,
        distribution: summarize(samples)?,
    })
}

pub fn predict_team<S: PlayerSource + ?Sized>(
    source: &S,
    selection: &TeamSelection,
    period: u32,
    cfg: &EngineConfig,
) -> Result<DistributionSummary> {
    cfg.validate()?;
    selection.validate()?;
    let squad = resolve_squad(source, selection, period, cfg.history_window)?;
    summarize(simulate_team(selection, &squad, cfg)?)
}

/// Sum of single-fixture projections with no captaincy or chips.
pub fn predict_team_plain<S: PlayerSource + ?Sized>(
    source: &S,
    players: &[u32],
    period: u32,
    cfg: &EngineConfig,
) -> Result<DistributionSummary> {
    cfg.validate()?;
    let selection = TeamSelection::new(players.to_vec());
    let squad = resolve_squad(source, &selection, period, cfg.history_window)?;
    summarize(simulate_plain(players, &squad, cfg)?)
}
