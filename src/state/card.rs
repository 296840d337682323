//! Bingo cards.
//!
//! A card is a 5x5 grid. Column `c` holds five distinct numbers from the range
//! of its letter (B 1-15, I 16-30, N 31-45, G 46-60, O 61-75). The centre cell
//! is free: it carries no number and is marked from the start.

use std::fmt;
use std::ops::RangeInclusive;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::random::IdGenerator;

/// Card dimensions.
pub const CARD_SIZE: usize = 5;

/// Numbers per column range.
pub const NUMBERS_PER_LETTER: u8 = 15;

/// The free centre cell.
pub const CENTER: Position = Position { row: 2, col: 2 };

/// Column letters, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BingoLetter {
    B,
    I,
    N,
    G,
    O,
}

impl BingoLetter {
    pub const ALL: [BingoLetter; CARD_SIZE] = [Self::B, Self::I, Self::N, Self::G, Self::O];

    /// Letter for a drawable value. `None` outside 1..=75.
    pub fn for_value(value: u8) -> Option<Self> {
        match value {
            1..=15 => Some(Self::B),
            16..=30 => Some(Self::I),
            31..=45 => Some(Self::N),
            46..=60 => Some(Self::G),
            61..=75 => Some(Self::O),
            _ => None,
        }
    }

    /// Column index on the card.
    pub fn column(&self) -> usize {
        *self as usize
    }

    /// Values reserved for this column.
    pub fn range(&self) -> RangeInclusive<u8> {
        let start = self.column() as u8 * NUMBERS_PER_LETTER + 1;
        start..=start + NUMBERS_PER_LETTER - 1
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::B => 'B',
            Self::I => 'I',
            Self::N => 'N',
            Self::G => 'G',
            Self::O => 'O',
        }
    }
}

impl fmt::Display for BingoLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if position is within the card.
    pub fn is_valid(&self) -> bool {
        self.row < CARD_SIZE && self.col < CARD_SIZE
    }

    pub fn is_center(&self) -> bool {
        *self == CENTER
    }

    /// Every position, row-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CARD_SIZE).flat_map(|row| (0..CARD_SIZE).map(move |col| Position { row, col }))
    }
}

/// A single card cell. Serializes as the number, or `null` for the free cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(u8),
    Free,
}

impl Cell {
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Free => None,
        }
    }
}

/// A player's card. Serialize-only: the marked grid is private and only
/// [`BingoCard::from_numbers`] may build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BingoCard {
    pub id: String,
    pub numbers: [[Cell; CARD_SIZE]; CARD_SIZE],
    marked: [[bool; CARD_SIZE]; CARD_SIZE],
}

impl BingoCard {
    /// Build a card from a grid. The centre is forced free and marked.
    pub fn from_numbers(id: String, mut numbers: [[Cell; CARD_SIZE]; CARD_SIZE]) -> Self {
        numbers[CENTER.row][CENTER.col] = Cell::Free;
        let mut marked = [[false; CARD_SIZE]; CARD_SIZE];
        marked[CENTER.row][CENTER.col] = true;
        Self { id, numbers, marked }
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        pos.is_valid().then(|| self.numbers[pos.row][pos.col])
    }

    pub fn number_at(&self, pos: Position) -> Option<u8> {
        self.cell(pos).and_then(|c| c.number())
    }

    pub fn is_marked(&self, pos: Position) -> bool {
        pos.is_valid() && self.marked[pos.row][pos.col]
    }

    /// Flip a cell's mark and return the new value. The centre stays marked.
    pub fn toggle(&mut self, pos: Position) -> bool {
        if !pos.is_valid() {
            return false;
        }
        if !pos.is_center() {
            self.marked[pos.row][pos.col] = !self.marked[pos.row][pos.col];
        }
        self.marked[pos.row][pos.col]
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// Generates fresh cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardGenerator;

impl CardGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, rng: &mut dyn RngCore, ids: &mut dyn IdGenerator) -> BingoCard {
        let mut numbers = [[Cell::Free; CARD_SIZE]; CARD_SIZE];
        for letter in BingoLetter::ALL {
            let picks = pick_distinct(rng, letter.range(), CARD_SIZE);
            for (row, value) in picks.into_iter().enumerate() {
                numbers[row][letter.column()] = Cell::Number(value);
            }
        }
        BingoCard::from_numbers(ids.next_id(), numbers)
    }
}

/// Draw `count` distinct values from `range`, shrinking the candidate pool each pick.
fn pick_distinct(rng: &mut dyn RngCore, range: RangeInclusive<u8>, count: usize) -> Vec<u8> {
    let mut pool: Vec<u8> = range.collect();
    let mut picks = Vec::with_capacity(count);
    while picks.len() < count && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        picks.push(pool.remove(idx));
    }
    picks
}
