use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Available,
    Doubtful,
    Injured,
    Suspended,
}

impl PlayerStatus {
    /// Maps the one-letter status codes used by the fantasy API.
    /// Codes for players who are out of the squad entirely (`u`, `n`, `o`)
    /// are treated as injured since they cannot score either.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "d" => PlayerStatus::Doubtful,
            "i" | "u" | "n" | "o" => PlayerStatus::Injured,
            "s" => PlayerStatus::Suspended,
            _ => PlayerStatus::Available,
        }
    }

    pub fn can_play(self) -> bool {
        matches!(self, PlayerStatus::Available | PlayerStatus::Doubtful)
    }
}

/// Season-to-date inputs for one player. Rebuilt per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSignal {
    pub id: u32,
    pub team_id: u32,
    pub status: PlayerStatus,
    #[serde(default)]
    pub points_per_game: Option<f64>,
    #[serde(default)]
    pub form: Option<f64>,
    #[serde(default)]
    pub xgi: Option<f64>,
    /// Per-period point totals, oldest first.
    #[serde(default)]
    pub history: Vec<f64>,
}

impl PlayerSignal {
    pub fn new(id: u32, team_id: u32, status: PlayerStatus) -> Self {
        Self {
            id,
            team_id,
            status,
            points_per_game: None,
            form: None,
            xgi: None,
            history: Vec::new(),
        }
    }

    pub fn with_stats(mut self, points_per_game: f64, form: f64, xgi: f64) -> Self {
        self.points_per_game = Some(points_per_game);
        self.form = Some(form);
        self.xgi = Some(xgi);
        self
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        self.history = history;
        self
    }
}

/// Ordinal fixture difficulty: 1 (very easy) to 5 (very hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const NEUTRAL: Difficulty = Difficulty(3);

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::invalid(format!(
                "fixture difficulty {value} outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Out-of-range values from stored data are pulled back onto the scale.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Each step away from neutral shifts expected points by 10%.
    pub fn adjustment(self) -> f64 {
        1.0 + (3.0 - self.0 as f64) * 0.1
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self> {
        Difficulty::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub difficulty: Difficulty,
    pub venue: Venue,
}

/// The fixtures one team plays in one period. Empty is a blank period,
/// two entries is a double.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureContext {
    pub fixtures: Vec<Fixture>,
}

impl FixtureContext {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn single(difficulty: Difficulty, venue: Venue) -> Self {
        Self {
            fixtures: vec![Fixture { difficulty, venue }],
        }
    }

    pub fn from_fixtures(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures }
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_blank(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn is_double(&self) -> bool {
        self.fixtures.len() >= 2
    }

    /// Only the first fixture, or a neutral home fixture for a blank period.
    pub fn first_or_neutral(&self) -> Self {
        let first = self.fixtures.first().copied().unwrap_or(Fixture {
            difficulty: Difficulty::NEUTRAL,
            venue: Venue::Home,
        });
        Self::from_fixtures(vec![first])
    }
}
