//! Room errors.
//!
//! Every rejected request maps to one [`RoomError`]. Its `Display` text is the
//! message sent back to the requester; [`ErrorKind`] groups errors for callers
//! that only care about the category.

use thiserror::Error;

use super::room::RoomPhase;

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed letter, bad cell coordinates, blank name.
    InvalidInput,
    /// Caller is not the current host.
    Authorization,
    /// Operation not allowed in the current phase.
    PhaseViolation,
    /// Duplicate join, room already in use.
    Conflict,
    /// Unknown player or missing room.
    NotFound,
    /// Reclaim secret matches nothing.
    InvalidToken,
    /// No numbers left to draw.
    Exhausted,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Authorization => "authorization",
            Self::PhaseViolation => "phase_violation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InvalidToken => "invalid_token",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Room errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Invalid letter: {0}. Must be A-Z")]
    InvalidLetter(String),

    #[error("Claimed letter {claimed} does not match the selected pattern {selected}")]
    LetterMismatch { claimed: String, selected: String },

    #[error("Invalid cell ({row}, {col})")]
    InvalidCell { row: i64, col: i64 },

    #[error("Name must not be blank")]
    BlankName,

    #[error("Only host can perform this action")]
    NotHost,

    #[error("Cannot {action} while the game is {phase}")]
    WrongPhase {
        action: &'static str,
        phase: RoomPhase,
    },

    #[error("Room is already in use")]
    RoomInUse,

    #[error("Player already joined")]
    AlreadyJoined,

    #[error("Session is already bound to someone else")]
    SessionInUse,

    #[error("Room is not created yet")]
    NoHost,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Invalid host token")]
    InvalidHostToken,

    #[error("Invalid player token")]
    InvalidPlayerToken,

    #[error("No more numbers available")]
    Exhausted,
}

impl RoomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLetter(_)
            | Self::LetterMismatch { .. }
            | Self::InvalidCell { .. }
            | Self::BlankName => ErrorKind::InvalidInput,
            Self::NotHost => ErrorKind::Authorization,
            Self::WrongPhase { .. } => ErrorKind::PhaseViolation,
            Self::RoomInUse | Self::AlreadyJoined | Self::SessionInUse => ErrorKind::Conflict,
            Self::NoHost | Self::PlayerNotFound => ErrorKind::NotFound,
            Self::InvalidHostToken | Self::InvalidPlayerToken => ErrorKind::InvalidToken,
            Self::Exhausted => ErrorKind::Exhausted,
        }
    }
}
