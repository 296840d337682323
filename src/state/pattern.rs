//! Letter patterns.
//!
//! A fixed catalog of 5x5 block letters, one per letter A-Z. A `true` cell must
//! be marked (and backed by a drawn number) for a card to complete the letter.
//! Every shape also requires the free centre cell.

use serde::Serialize;

use super::card::{Position, CARD_SIZE, CENTER};
use super::error::RoomError;

/// Block letter art, `#` marks a required cell.
const SHAPES: [[&[u8; CARD_SIZE]; CARD_SIZE]; 26] = [
    [b"#####", b"#...#", b"#####", b"#...#", b"#...#"], // A
    [b"####.", b"#...#", b"####.", b"#...#", b"####."], // B
    [b"#####", b"#....", b"#....", b"#....", b"#####"], // C
    [b"####.", b"#...#", b"#...#", b"#...#", b"####."], // D
    [b"#####", b"#....", b"#####", b"#....", b"#####"], // E
    [b"#####", b"#....", b"#####", b"#....", b"#...."], // F
    [b"#####", b"#....", b"#.###", b"#...#", b"#####"], // G
    [b"#...#", b"#...#", b"#####", b"#...#", b"#...#"], // H
    [b"#####", b"..#..", b"..#..", b"..#..", b"#####"], // I
    [b"..###", b"....#", b"....#", b"#...#", b"#####"], // J
    [b"#...#", b"#..#.", b"###..", b"#..#.", b"#...#"], // K
    [b"#....", b"#....", b"#....", b"#....", b"#####"], // L
    [b"#...#", b"##.##", b"#.#.#", b"#...#", b"#...#"], // M
    [b"#...#", b"##..#", b"#.#.#", b"#..##", b"#...#"], // N
    [b"#####", b"#...#", b"#...#", b"#...#", b"#####"], // O
    [b"#####", b"#...#", b"#####", b"#....", b"#...."], // P
    [b"#####", b"#...#", b"#...#", b"#..#.", b"####."], // Q
    [b"#####", b"#...#", b"#####", b"#..#.", b"#...#"], // R
    [b"#####", b"#....", b"#####", b"....#", b"#####"], // S
    [b"#####", b"..#..", b"..#..", b"..#..", b"..#.."], // T
    [b"#...#", b"#...#", b"#...#", b"#...#", b"#####"], // U
    [b"#...#", b"#...#", b"#...#", b".#.#.", b"..#.."], // V
    [b"#...#", b"#...#", b"#.#.#", b".###.", b"#...#"], // W
    [b"#...#", b".#.#.", b"..#..", b".#.#.", b"#...#"], // X
    [b"#...#", b".#.#.", b"..#..", b"..#..", b"..#.."], // Y
    [b"#####", b"...#.", b"..#..", b".#...", b"#####"], // Z
];

/// A letter-shaped 5x5 mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub letter: char,
    pub cells: [[bool; CARD_SIZE]; CARD_SIZE],
}

impl Pattern {
    fn from_shape(letter: char, shape: &[&[u8; CARD_SIZE]; CARD_SIZE]) -> Self {
        let mut cells = [[false; CARD_SIZE]; CARD_SIZE];
        for (row, art) in shape.iter().enumerate() {
            for (col, byte) in art.iter().enumerate() {
                cells[row][col] = *byte == b'#';
            }
        }
        cells[CENTER.row][CENTER.col] = true;
        Self { letter, cells }
    }

    /// Whether the cell at `pos` is part of the shape.
    pub fn requires(&self, pos: Position) -> bool {
        pos.is_valid() && self.cells[pos.row][pos.col]
    }

    /// All required positions, row-major.
    pub fn required_cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |p| self.requires(*p))
    }

    pub fn required_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c).count()
    }
}

/// Normalise user input to an upper-case letter A-Z.
pub fn parse_letter(letter: &str) -> Option<char> {
    let mut chars = letter.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Check a letter without failing.
pub fn is_valid_letter(letter: &str) -> bool {
    parse_letter(letter).is_some()
}

/// Look up the pattern for a letter (case-insensitive).
pub fn get_pattern(letter: &str) -> Result<Pattern, RoomError> {
    let upper = parse_letter(letter).ok_or_else(|| RoomError::InvalidLetter(letter.to_string()))?;
    let index = (upper as u8 - b'A') as usize;
    Ok(Pattern::from_shape(upper, &SHAPES[index]))
}

/// Letters covered by the catalog.
pub fn letters() -> impl Iterator<Item = char> {
    'A'..='Z'
}
