//! Number draws.
//!
//! Draws pick from 1..=75 without replacement. The room's history is the only
//! record of what has been drawn.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::card::BingoLetter;
use super::error::RoomError;

/// Highest drawable value.
pub const MAX_NUMBER: u8 = 75;

/// A drawn number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingoNumber {
    pub letter: BingoLetter,
    pub value: u8,
    pub drawn_at: DateTime<Utc>,
}

impl BingoNumber {
    /// Build a number drawn now. `None` outside 1..=75.
    pub fn new(value: u8) -> Option<Self> {
        Self::at(value, Utc::now())
    }

    pub fn at(value: u8, drawn_at: DateTime<Utc>) -> Option<Self> {
        let letter = BingoLetter::for_value(value)?;
        Some(Self {
            letter,
            value,
            drawn_at,
        })
    }

    /// Caller-facing label, e.g. `"G-52"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.letter, self.value)
    }
}

/// Draws numbers against a history.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawEngine;

impl DrawEngine {
    pub fn new() -> Self {
        Self
    }

    /// Values not yet drawn, ascending.
    pub fn available(&self, history: &[BingoNumber]) -> Vec<u8> {
        let drawn: HashSet<u8> = history.iter().map(|n| n.value).collect();
        (1..=MAX_NUMBER).filter(|v| !drawn.contains(v)).collect()
    }

    pub fn remaining(&self, history: &[BingoNumber]) -> usize {
        self.available(history).len()
    }

    /// Pick one undrawn value uniformly. The caller appends it to the history.
    pub fn draw(
        &self,
        history: &[BingoNumber],
        rng: &mut dyn RngCore,
    ) -> Result<BingoNumber, RoomError> {
        let available = self.available(history);
        if available.is_empty() {
            return Err(RoomError::Exhausted);
        }
        let value = available[rng.random_range(0..available.len())];
        BingoNumber::new(value).ok_or(RoomError::Exhausted)
    }
}
