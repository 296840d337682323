//! Win validation.
//!
//! A claim wins only when every cell of the selected letter's shape is marked
//! on the card and, for numbered cells, the number has actually been drawn.

use std::collections::HashSet;

use super::card::BingoCard;
use super::draw::BingoNumber;
use super::pattern;

/// Checks claims against letter patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinValidator;

impl WinValidator {
    pub fn new() -> Self {
        Self
    }

    /// Whether `card` completes `selected_letter` given the drawn numbers.
    ///
    /// Fails closed: no letter, a blank one, or one outside A-Z is never a win.
    pub fn validate(
        &self,
        card: &BingoCard,
        drawn: &[BingoNumber],
        selected_letter: Option<&str>,
    ) -> bool {
        let Some(letter) = selected_letter.filter(|l| !l.trim().is_empty()) else {
            return false;
        };
        let Ok(pattern) = pattern::get_pattern(letter) else {
            return false;
        };

        let drawn: HashSet<u8> = drawn.iter().map(|n| n.value).collect();
        let mut required = 0;
        for pos in pattern.required_cells() {
            required += 1;
            if !card.is_marked(pos) {
                return false;
            }
            if pos.is_center() {
                continue;
            }
            match card.number_at(pos) {
                Some(value) if drawn.contains(&value) => {}
                _ => return false,
            }
        }
        required > 0
    }
}
