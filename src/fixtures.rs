use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::signals::{Difficulty, Fixture, FixtureContext, Venue};

/// One scheduled match as stored, with difficulty rated from each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub id: u32,
    pub period: u32,
    pub team_h: u32,
    pub team_a: u32,
    pub difficulty_home: Difficulty,
    pub difficulty_away: Difficulty,
}

impl FixtureRecord {
    /// The fixture as seen by `team_id`, or `None` if that team isn't playing.
    pub fn for_team(&self, team_id: u32) -> Option<Fixture> {
        if self.team_h == team_id {
            Some(Fixture {
                difficulty: self.difficulty_home,
                venue: Venue::Home,
            })
        } else if self.team_a == team_id {
            Some(Fixture {
                difficulty: self.difficulty_away,
                venue: Venue::Away,
            })
        } else {
            None
        }
    }
}

/// Fixture table indexed by period.
#[derive(Debug, Clone, Default)]
pub struct FixtureResolver {
    by_period: HashMap<u32, Vec<FixtureRecord>>,
}

impl FixtureResolver {
    pub fn new(records: impl IntoIterator<Item = FixtureRecord>) -> Self {
        let mut by_period: HashMap<u32, Vec<FixtureRecord>> = HashMap::new();
        for r in records {
            by_period.entry(r.period).or_default().push(r);
        }
        for list in by_period.values_mut() {
            list.sort_by_key(|r| r.id);
            list.dedup_by_key(|r| r.id);
        }
        Self { by_period }
    }

    /// All fixtures `team_id` plays in `period`. A blank period is an empty
    /// context, not an error.
    pub fn fixtures_for(&self, team_id: u32, period: u32) -> FixtureContext {
        let fixtures = self
            .by_period
            .get(&period)
            .map(|list| list.iter().filter_map(|r| r.for_team(team_id)).collect())
            .unwrap_or_default();
        FixtureContext::from_fixtures(fixtures)
    }

    pub fn len(&self) -> usize {
        self.by_period.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: u32, period: u32, h: u32, a: u32, dh: u8, da: u8) -> FixtureRecord {
        FixtureRecord {
            id,
            period,
            team_h: h,
            team_a: a,
            difficulty_home: Difficulty::new(dh).unwrap(),
            difficulty_away: Difficulty::new(da).unwrap(),
        }
    }

    #[test]
    fn resolves_blank_single_and_double() {
        let resolver = FixtureResolver::new(vec![
            rec(1, 14, 1, 2, 2, 4),
            rec(2, 14, 3, 1, 3, 5),
            rec(3, 15, 2, 3, 3, 3),
        ]);
        assert!(resolver.fixtures_for(4, 14).is_blank());
        assert_eq!(resolver.fixtures_for(2, 14).len(), 1);

        let double = resolver.fixtures_for(1, 14);
        assert!(double.is_double());
        assert_eq!(double.fixtures[0].venue, Venue::Home);
        assert_eq!(double.fixtures[0].difficulty.value(), 2);
        assert_eq!(double.fixtures[1].venue, Venue::Away);
        assert_eq!(double.fixtures[1].difficulty.value(), 5);
        assert!(resolver.fixtures_for(1, 15).is_blank());
    }
}
