use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{EngineConfig, VarianceConfig};
use crate::error::{EngineError, Result};
use crate::player_model::{PlayerProjection, project_player};
use crate::sampler::{SampleArray, Sampler, SeedSource};
use crate::selection::TeamSelection;
use crate::source::ResolvedSquad;

/// Per-player draws of one run, in candidate order.
#[derive(Debug, Clone)]
pub struct SquadDraws {
    pub players: Vec<(u32, SampleArray)>,
}

impl SquadDraws {
    pub fn get(&self, id: u32) -> Option<&SampleArray> {
        self.players.iter().find(|(pid, _)| *pid == id).map(|(_, s)| s)
    }

    pub fn n(&self) -> usize {
        self.players.first().map(|(_, s)| s.len()).unwrap_or(0)
    }
}

/// Team points for one period: starters (plus bench under bench boost),
/// with the captain bonus applied per universe.
pub fn simulate_team(
    selection: &TeamSelection,
    squad: &ResolvedSquad,
    cfg: &EngineConfig,
) -> Result<SampleArray> {
    cfg.validate()?;
    let seed = SeedSource::from_option(cfg.seed).resolve();
    let draws = draw_squad(selection, squad, cfg.n_sims, &cfg.variance, seed, cfg.parallel)?;
    let total = combine(selection, &draws)?;
    info!(
        period = squad.period,
        candidates = draws.players.len(),
        n = cfg.n_sims,
        mean = total.mean(),
        "team simulation complete"
    );
    Ok(total)
}

/// Draws every candidate from its own stream of `seed`. Slot `k` of the
/// candidate list always uses stream `k`, so sequential and parallel runs
/// produce identical arrays.
pub fn draw_squad(
    selection: &TeamSelection,
    squad: &ResolvedSquad,
    n: usize,
    variance: &VarianceConfig,
    seed: u64,
    parallel: bool,
) -> Result<SquadDraws> {
    selection.validate()?;
    if n == 0 {
        return Err(EngineError::invalid("sample count must be at least 1"));
    }

    let candidates = unique_candidates(selection);
    let projections: Vec<PlayerProjection> = candidates
        .iter()
        .map(|&id| project_candidate(id, squad, variance))
        .collect();

    let draw_one = |(slot, proj): (usize, &PlayerProjection)| {
        let mut sampler = Sampler::for_stream(seed, slot as u64);
        proj.sample(&mut sampler, n).map(|s| (proj.player_id, s))
    };

    let players = if parallel {
        projections
            .par_iter()
            .enumerate()
            .map(draw_one)
            .collect::<Result<Vec<_>>>()?
    } else {
        projections
            .iter()
            .enumerate()
            .map(draw_one)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(SquadDraws { players })
}

/// Sums the candidates' draws and adds `(multiplier - 1)` times the
/// effective captain sample.
pub fn combine(selection: &TeamSelection, draws: &SquadDraws) -> Result<SampleArray> {
    selection.validate()?;
    let n = draws.n();
    if n == 0 {
        return Err(EngineError::invalid("no draws to combine"));
    }

    let mut total = SampleArray::zeros(n);
    for id in unique_candidates(selection) {
        let samples = draws.get(id).ok_or_else(|| {
            EngineError::invalid(format!("no draws for candidate player {id}"))
        })?;
        total.add(samples)?;
    }

    let Some(captain_id) = selection.captain else {
        return Ok(total);
    };
    let Some(captain) = draws.get(captain_id) else {
        return Ok(total);
    };
    let vice = selection
        .vice_captain
        .filter(|id| *id != captain_id)
        .and_then(|id| draws.get(id));

    let effective = effective_captain(captain, vice)?;
    total.add_scaled(&effective, selection.captain_multiplier() - 1.0)?;
    Ok(total)
}

/// The captain's draw per universe, with the vice-captain's draw standing in
/// wherever the captain drew exactly zero.
pub fn effective_captain(captain: &SampleArray, vice: Option<&SampleArray>) -> Result<Vec<f64>> {
    let Some(vice) = vice else {
        return Ok(captain.as_slice().to_vec());
    };
    if vice.len() != captain.len() {
        return Err(EngineError::invalid(format!(
            "captain and vice-captain draws misaligned: {} vs {}",
            captain.len(),
            vice.len()
        )));
    }
    Ok(captain
        .iter()
        .zip(vice.iter())
        .map(|(&c, &v)| if c == 0.0 { v } else { c })
        .collect())
}

/// Plain sum of players using only each team's first fixture (a neutral one
/// for a blank period). No captaincy, chips, or double-period handling.
/// Unavailable players still score zero here, unlike the older basic model
/// which never applied its minutes estimate.
pub fn simulate_plain(
    players: &[u32],
    squad: &ResolvedSquad,
    cfg: &EngineConfig,
) -> Result<SampleArray> {
    cfg.validate()?;
    if players.is_empty() {
        return Err(EngineError::invalid("no players to simulate"));
    }
    let seed = SeedSource::from_option(cfg.seed).resolve();
    let mut total = SampleArray::zeros(cfg.n_sims);

    for (slot, &id) in players.iter().enumerate() {
        let proj = match squad.get(id) {
            Some(p) => project_player(&p.signal, &p.fixtures.first_or_neutral(), &cfg.variance),
            None => {
                warn!(player_id = id, "player missing from resolved squad; scoring zero");
                continue;
            }
        };
        let mut sampler = Sampler::for_stream(seed, slot as u64);
        total.add(&proj.sample(&mut sampler, cfg.n_sims)?)?;
    }
    Ok(total)
}

fn project_candidate(id: u32, squad: &ResolvedSquad, variance: &VarianceConfig) -> PlayerProjection {
    match squad.get(id) {
        Some(p) => project_player(&p.signal, &p.fixtures, variance),
        None => {
            warn!(player_id = id, "player missing from resolved squad; scoring zero");
            PlayerProjection::zero(id)
        }
    }
}

/// Candidate ids in selection order, each once.
fn unique_candidates(selection: &TeamSelection) -> Vec<u32> {
    let mut seen = HashSet::new();
    selection
        .candidates()
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Chip;

    fn draws(players: Vec<(u32, Vec<f64>)>) -> SquadDraws {
        SquadDraws {
            players: players
                .into_iter()
                .map(|(id, v)| (id, SampleArray::from_vec(v).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn vice_captain_covers_zero_universes_only() {
        let d = draws(vec![(1, vec![0.0, 5.0, 0.0, 2.0]), (2, vec![3.0, 4.0, 6.0, 1.0])]);
        let sel = TeamSelection::new(vec![1, 2])
            .with_captain(1)
            .with_vice_captain(2);
        let total = combine(&sel, &d).unwrap();
        assert_eq!(total.as_slice(), &[6.0, 14.0, 12.0, 5.0]);
    }

    #[test]
    fn no_vice_means_no_substitution() {
        let d = draws(vec![(1, vec![0.0, 5.0]), (2, vec![3.0, 4.0])]);
        let sel = TeamSelection::new(vec![1, 2]).with_captain(1);
        let total = combine(&sel, &d).unwrap();
        assert_eq!(total.as_slice(), &[3.0, 14.0]);
    }

    #[test]
    fn captain_outside_candidates_gets_no_bonus() {
        let d = draws(vec![(1, vec![1.0, 2.0]), (2, vec![3.0, 4.0])]);
        let sel = TeamSelection::new(vec![1, 2])
            .with_bench(vec![9])
            .with_captain(9)
            .with_vice_captain(1);
        let total = combine(&sel, &d).unwrap();
        assert_eq!(total.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn triple_captain_adds_one_more_captain_share() {
        let d = draws(vec![(1, vec![2.0, 0.0, 7.0]), (2, vec![1.0, 3.0, 0.0])]);
        let base = TeamSelection::new(vec![1, 2])
            .with_captain(1)
            .with_vice_captain(2);
        let normal = combine(&base, &d).unwrap();
        let triple = combine(&base.clone().with_chip(Chip::TripleCaptain), &d).unwrap();
        let eff = effective_captain(d.get(1).unwrap(), d.get(2)).unwrap();
        for i in 0..3 {
            assert_eq!(triple.as_slice()[i], normal.as_slice()[i] + eff[i]);
        }
    }

    #[test]
    fn missing_candidate_draws_are_an_input_error() {
        let d = draws(vec![(1, vec![1.0])]);
        let sel = TeamSelection::new(vec![1, 2]);
        assert!(matches!(
            combine(&sel, &d),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
