#![no_std]

extern crate alloc;

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use schedule::*;
pub use source::*;
pub use types::*;

mod card;
mod deck;
mod engine;
mod error;
mod schedule;
mod source;
#[cfg(test)]
mod test_util;
mod types;

/// Rule constants for one session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub pairs: PairCount,
    pub lives: Lives,
    pub resolve_delay_ms: u32,
}

impl GameConfig {
    pub const DEFAULT_PAIRS: PairCount = 8;
    pub const DEFAULT_LIVES: Lives = 6;
    pub const DEFAULT_RESOLVE_DELAY_MS: u32 = 1000;

    /// Largest board the engine deals: 128 cards.
    pub const MAX_PAIRS: PairCount = 64;
    pub const MAX_LIVES: Lives = 99;
    pub const MAX_RESOLVE_DELAY_MS: u32 = 60_000;

    pub const fn new_unchecked(pairs: PairCount, lives: Lives, resolve_delay_ms: u32) -> Self {
        Self {
            pairs,
            lives,
            resolve_delay_ms,
        }
    }

    pub fn new(pairs: PairCount, lives: Lives, resolve_delay_ms: u32) -> Self {
        let pairs = pairs.clamp(1, Self::MAX_PAIRS);
        let lives = lives.clamp(1, Self::MAX_LIVES);
        let resolve_delay_ms = resolve_delay_ms.min(Self::MAX_RESOLVE_DELAY_MS);
        Self::new_unchecked(pairs, lives, resolve_delay_ms)
    }

    pub const fn total_cards(&self) -> usize {
        self.pairs as usize * 2
    }

    pub const fn resolve_delay(&self) -> Duration {
        Duration::from_millis(self.resolve_delay_ms as u64)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            Self::DEFAULT_PAIRS,
            Self::DEFAULT_LIVES,
            Self::DEFAULT_RESOLVE_DELAY_MS,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    Flipped,
    PairPending(PendingResolution),
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn pending(self) -> Option<PendingResolution> {
        match self {
            Self::PairPending(task) => Some(task),
            Self::NoChange | Self::Flipped => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Matched,
    Mismatched,
    Won,
    Lost,
}

impl ResolveOutcome {
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched | Self::Won)
    }

    pub const fn ends_game(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
