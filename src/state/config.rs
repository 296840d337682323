//! Room configuration.

use serde::Deserialize;

use super::error::RoomError;
use super::pattern;

/// Default room identifier.
pub const DEFAULT_ROOM_ID: &str = "BINGO-ROOM";

/// Settings applied every time a room is (re)created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomConfig {
    /// Identifier reported in every room view
    pub room_id: String,

    /// Pattern selected when a room is created (host can change it while waiting)
    pub default_letter: Option<String>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_id: DEFAULT_ROOM_ID.to_string(),
            default_letter: None,
        }
    }
}

impl RoomConfig {
    pub fn with_default_letter(mut self, letter: impl Into<String>) -> Self {
        self.default_letter = Some(letter.into());
        self
    }

    /// Parse from JSON, rejecting an unknown default letter.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(text)?;
        if let Err(e) = config.initial_letter() {
            return Err(serde::de::Error::custom(e));
        }
        Ok(config)
    }

    /// The normalised default letter.
    pub fn initial_letter(&self) -> Result<Option<char>, RoomError> {
        match &self.default_letter {
            None => Ok(None),
            Some(letter) => pattern::parse_letter(letter)
                .map(Some)
                .ok_or_else(|| RoomError::InvalidLetter(letter.clone())),
        }
    }
}
