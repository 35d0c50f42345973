//! Collaborator boundary. Lookups happen here, before any sampling starts;
//! the simulation itself only sees resolved in-memory data.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::fixtures::{FixtureRecord, FixtureResolver};
use crate::selection::TeamSelection;
use crate::signals::{FixtureContext, PlayerSignal};

pub trait PlayerSource {
    /// Fails with [`EngineError::NotFound`] for an unknown id.
    fn get_player(&self, id: u32) -> Result<PlayerSignal>;

    /// Empty context for a blank period.
    fn get_fixtures(&self, team_id: u32, period: u32) -> Result<FixtureContext>;

    /// Up to `last_n` period totals, oldest first.
    fn get_recent_history(&self, player_id: u32, last_n: usize) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlayer {
    pub signal: PlayerSignal,
    pub fixtures: FixtureContext,
}

/// Everything a team run needs, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSquad {
    pub period: u32,
    players: HashMap<u32, ResolvedPlayer>,
}

impl ResolvedSquad {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            players: HashMap::new(),
        }
    }

    pub fn insert(&mut self, player: ResolvedPlayer) {
        self.players.insert(player.signal.id, player);
    }

    pub fn with_player(mut self, signal: PlayerSignal, fixtures: FixtureContext) -> Self {
        self.insert(ResolvedPlayer { signal, fixtures });
        self
    }

    pub fn get(&self, id: u32) -> Option<&ResolvedPlayer> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

pub fn resolve_player<S: PlayerSource + ?Sized>(
    source: &S,
    id: u32,
    period: u32,
    history_window: usize,
) -> Result<ResolvedPlayer> {
    let mut signal = source.get_player(id)?;
    signal.history = source.get_recent_history(id, history_window)?;
    let fixtures = source.get_fixtures(signal.team_id, period)?;
    Ok(ResolvedPlayer { signal, fixtures })
}

/// Resolves every player whose points can count for `selection`.
/// Lookup failures propagate unchanged.
pub fn resolve_squad<S: PlayerSource + ?Sized>(
    source: &S,
    selection: &TeamSelection,
    period: u32,
    history_window: usize,
) -> Result<ResolvedSquad> {
    let mut squad = ResolvedSquad::new(period);
    for id in selection.candidates() {
        if squad.get(id).is_some() {
            continue;
        }
        squad.insert(resolve_player(source, id, period, history_window)?);
    }
    Ok(squad)
}

/// In-memory source for tests and precomputed snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: HashMap<u32, PlayerSignal>,
    history: HashMap<u32, Vec<f64>>,
    fixtures: FixtureResolver,
}

impl MemoryStore {
    pub fn new(fixtures: impl IntoIterator<Item = FixtureRecord>) -> Self {
        Self {
            fixtures: FixtureResolver::new(fixtures),
            ..Self::default()
        }
    }

    /// Stores the signal; its history becomes the player's recorded history.
    pub fn insert_player(&mut self, mut signal: PlayerSignal) {
        let history = std::mem::take(&mut signal.history);
        self.history.insert(signal.id, history);
        self.players.insert(signal.id, signal);
    }

    pub fn with_player(mut self, signal: PlayerSignal) -> Self {
        self.insert_player(signal);
        self
    }
}

impl PlayerSource for MemoryStore {
    fn get_player(&self, id: u32) -> Result<PlayerSignal> {
        self.players
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::player_not_found(id))
    }

    fn get_fixtures(&self, team_id: u32, period: u32) -> Result<FixtureContext> {
        Ok(self.fixtures.fixtures_for(team_id, period))
    }

    fn get_recent_history(&self, player_id: u32, last_n: usize) -> Result<Vec<f64>> {
        let all = self.history.get(&player_id).map(Vec::as_slice).unwrap_or(&[]);
        let start = all.len().saturating_sub(last_n);
        Ok(all[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Difficulty, PlayerStatus};

    fn store() -> MemoryStore {
        MemoryStore::new(vec![FixtureRecord {
            id: 1,
            period: 7,
            team_h: 1,
            team_a: 2,
            difficulty_home: Difficulty::new(2).unwrap(),
            difficulty_away: Difficulty::new(4).unwrap(),
        }])
        .with_player(
            PlayerSignal::new(10, 1, PlayerStatus::Available)
                .with_history(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        )
        .with_player(PlayerSignal::new(11, 3, PlayerStatus::Available))
    }

    #[test]
    fn history_window_keeps_most_recent() {
        let s = store();
        assert_eq!(s.get_recent_history(10, 3).unwrap(), vec![4.0, 5.0, 6.0]);
        assert!(s.get_recent_history(11, 5).unwrap().is_empty());
    }

    #[test]
    fn unknown_player_propagates_not_found() {
        let sel = TeamSelection::new(vec![10, 99]);
        let err = resolve_squad(&store(), &sel, 7, 5).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { id: 99, .. }));
    }

    #[test]
    fn resolves_fixtures_and_history() {
        let sel = TeamSelection::new(vec![10, 11, 10]);
        let squad = resolve_squad(&store(), &sel, 7, 5).unwrap();
        assert_eq!(squad.len(), 2);
        let p = squad.get(10).unwrap();
        assert_eq!(p.signal.history.len(), 5);
        assert_eq!(p.fixtures.len(), 1);
        assert!(squad.get(11).unwrap().fixtures.is_blank());
    }
}
