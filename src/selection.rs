use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chip {
    /// Captain scores 3x instead of 2x.
    TripleCaptain,
    /// Bench players' points are counted.
    BenchBoost,
}

/// One manager's picks for a single period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSelection {
    pub starting: Vec<u32>,
    #[serde(default)]
    pub bench: Vec<u32>,
    #[serde(default)]
    pub captain: Option<u32>,
    #[serde(default)]
    pub vice_captain: Option<u32>,
    #[serde(default)]
    pub chips: Vec<Chip>,
}

impl TeamSelection {
    pub fn new(starting: Vec<u32>) -> Self {
        Self {
            starting,
            ..Self::default()
        }
    }

    pub fn with_bench(mut self, bench: Vec<u32>) -> Self {
        self.bench = bench;
        self
    }

    pub fn with_captain(mut self, captain: u32) -> Self {
        self.captain = Some(captain);
        self
    }

    pub fn with_vice_captain(mut self, vice: u32) -> Self {
        self.vice_captain = Some(vice);
        self
    }

    pub fn with_chip(mut self, chip: Chip) -> Self {
        if !self.chips.contains(&chip) {
            self.chips.push(chip);
        }
        self
    }

    pub fn has_chip(&self, chip: Chip) -> bool {
        self.chips.contains(&chip)
    }

    pub fn captain_multiplier(&self) -> f64 {
        if self.has_chip(Chip::TripleCaptain) {
            3.0
        } else {
            2.0
        }
    }

    /// Players whose points count: the starters, plus the bench under bench boost.
    pub fn candidates(&self) -> Vec<u32> {
        let mut out = self.starting.clone();
        if self.has_chip(Chip::BenchBoost) {
            out.extend(self.bench.iter().copied());
        }
        out
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidates().is_empty() {
            return Err(EngineError::invalid("team selection has no players"));
        }
        Ok(())
    }
}
