//! Room state.
//!
//! The room is the single aggregate of the game: host binding, players, draw
//! history and phase.
//!
//! # Phase Diagram
//!
//! ```text
//!              start                win
//! ┌─────────┐ ───────▶ ┌─────────┐ ─────▶ ┌──────────┐
//! │ Waiting │          │ Playing │        │ Finished │
//! └─────────┘ ◀─────────────────────────── └──────────┘
//!      ▲                   restart
//!      │
//!      └── end game (from any phase, brand-new room)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::card::BingoCard;
use super::draw::BingoNumber;
use super::error::RoomError;

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    /// Host present or absent, players joining
    #[default]
    Waiting,
    /// Numbers are being drawn
    Playing,
    /// Someone won
    Finished,
}

impl RoomPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Finished => "finished",
        }
    }

    /// Compute the phase after `event`.
    pub fn apply(self, event: PhaseEvent) -> Result<Self, RoomError> {
        use PhaseEvent::*;
        use RoomPhase::*;

        match (self, event) {
            (Waiting, Start) => Ok(Playing),
            (Playing, Win) => Ok(Finished),
            (Finished, Restart) => Ok(Waiting),
            (phase, event) => Err(RoomError::WrongPhase {
                action: event.action(),
                phase,
            }),
        }
    }

    /// Fail unless the room is in `expected`.
    pub fn require(self, expected: RoomPhase, action: &'static str) -> Result<(), RoomError> {
        if self == expected {
            Ok(())
        } else {
            Err(RoomError::WrongPhase {
                action,
                phase: self,
            })
        }
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    Win,
    Restart,
}

impl PhaseEvent {
    fn action(&self) -> &'static str {
        match self {
            Self::Start => "start the game",
            Self::Win => "claim bingo",
            Self::Restart => "restart the game",
        }
    }
}

/// A player in the room.
#[derive(Debug, Clone)]
pub struct Player {
    /// Stable identity, survives reconnects
    pub id: String,

    /// Display name
    pub name: String,

    /// Current transport session (may be stale after a disconnect)
    pub socket_id: String,

    /// Bearer secret for reclaiming this player
    secret: String,

    pub card: BingoCard,
}

impl Player {
    pub fn new(id: String, name: String, socket_id: String, secret: String, card: BingoCard) -> Self {
        Self {
            id,
            name,
            socket_id,
            secret,
            card,
        }
    }

    pub fn to_public(&self) -> PublicPlayer {
        PublicPlayer {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Room state. Holds secrets, so it is never serialized directly.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,

    /// Host's current session
    pub host_id: Option<String>,

    pub host_name: Option<String>,

    /// Bearer secret for reclaiming the host role
    host_secret: Option<String>,

    /// Players in join order
    players: Vec<Player>,

    /// Draw history in draw order
    pub drawn_numbers: Vec<BingoNumber>,

    pub phase: RoomPhase,

    /// Pattern in play
    pub selected_letter: Option<char>,

    pub winner_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Create an empty room with no host.
    pub fn new(id: String, selected_letter: Option<char>) -> Self {
        let now = Utc::now();
        Self {
            id,
            host_id: None,
            host_name: None,
            host_secret: None,
            players: Vec::new(),
            drawn_numbers: Vec::new(),
            phase: RoomPhase::Waiting,
            selected_letter,
            winner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a room bound to a host.
    pub fn hosted(
        id: String,
        selected_letter: Option<char>,
        host_name: String,
        host_session: String,
        host_secret: String,
    ) -> Self {
        let mut room = Self::new(id, selected_letter);
        room.host_id = Some(host_session);
        room.host_name = Some(host_name);
        room.host_secret = Some(host_secret);
        room
    }

    pub fn has_host(&self) -> bool {
        self.host_id.is_some()
    }

    /// Check if `session` is the current host.
    pub fn is_host(&self, session: &str) -> bool {
        self.host_id.as_deref() == Some(session)
    }

    pub fn host_secret_matches(&self, secret: &str) -> bool {
        self.host_secret.as_deref() == Some(secret)
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_by_session(&self, session: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.socket_id == session)
    }

    pub fn player_by_session_mut(&mut self, session: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.socket_id == session)
    }

    pub fn player_by_secret_mut(&mut self, secret: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.secret == secret)
    }

    /// Check whether a session or a name is already taken by a player.
    pub fn is_taken(&self, session: &str, name: &str) -> bool {
        self.players
            .iter()
            .any(|p| p.socket_id == session || p.name == name)
    }

    pub fn drawn_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.drawn_numbers.iter().map(|n| n.value)
    }

    /// Record a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Sanitized view for broadcast.
    pub fn to_public(&self) -> PublicRoomState {
        PublicRoomState {
            id: self.id.clone(),
            host_name: self.host_name.clone(),
            players: self.players.iter().map(Player::to_public).collect(),
            phase: self.phase,
            drawn_numbers: self.drawn_numbers.clone(),
            selected_letter: self.selected_letter.map(String::from),
            winner_id: self.winner_id.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_public())
    }
}

/// Player as seen by everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicPlayer {
    pub id: String,
    pub name: String,
}

/// Room as seen by everyone. Carries no secrets and no cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRoomState {
    pub id: String,
    pub host_name: Option<String>,
    pub players: Vec<PublicPlayer>,
    #[serde(rename = "state")]
    pub phase: RoomPhase,
    pub drawn_numbers: Vec<BingoNumber>,
    pub selected_letter: Option<String>,
    pub winner_id: Option<String>,
}
