//! Lottery rounds played against a winning draw.
//!
//! A round is numbered from 1, holds one winning draw and can be played
//! once. An entry wins only when its draw equals the winning draw exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draw::Draw;
use crate::errors::LotteryError;
use crate::generators::{DrawRequest, UniqueDrawGenerator};
use crate::source::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryRound {
    round: u32,
    winning: Draw,
    drawn_at: DateTime<Utc>,
    played: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub player: String,
    pub draw: Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub round: u32,
    pub player: String,
    pub draw: Draw,
    pub matches: bool,
}

impl LotteryRound {
    /// Starts the round after `previous` (or round 1) with a given winning draw.
    pub fn with_winning(
        previous: Option<&LotteryRound>,
        winning: Draw,
    ) -> Result<Self, LotteryError> {
        let round = match previous {
            Some(p) => p
                .round
                .checked_add(1)
                .ok_or(LotteryError::RoundsExhausted(p.round))?,
            None => 1,
        };
        Ok(Self {
            round,
            winning,
            drawn_at: Utc::now(),
            played: false,
        })
    }

    /// Starts the round after `previous` with a freshly generated winning draw.
    pub fn draw<S: RandomSource + ?Sized>(
        previous: Option<&LotteryRound>,
        generator: &UniqueDrawGenerator,
        source: &mut S,
        request: &DrawRequest,
    ) -> Result<Self, LotteryError> {
        let winning = generator.generate_request(source, request)?;
        let round = Self::with_winning(previous, winning)?;
        tracing::info!(round = round.round, winning = %round.winning, "new winning draw");
        Ok(round)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn winning(&self) -> &Draw {
        &self.winning
    }

    pub fn drawn_at(&self) -> DateTime<Utc> {
        self.drawn_at
    }

    pub fn is_played(&self) -> bool {
        self.played
    }

    /// Plays every entry against the winning draw and closes the round.
    pub fn play(&mut self, entries: &[Entry]) -> Result<Vec<Outcome>, LotteryError> {
        if self.played {
            return Err(LotteryError::AlreadyPlayed(self.round));
        }
        if entries.is_empty() {
            return Err(LotteryError::NoEntries(self.round));
        }

        self.played = true;
        let outcomes: Vec<Outcome> = entries
            .iter()
            .map(|entry| Outcome {
                round: self.round,
                player: entry.player.clone(),
                draw: entry.draw.clone(),
                matches: entry.draw == self.winning,
            })
            .collect();

        let winners = outcomes.iter().filter(|o| o.matches).count();
        tracing::info!(round = self.round, entries = entries.len(), winners, "round played");
        Ok(outcomes)
    }
}
