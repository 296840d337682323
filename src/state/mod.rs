//! State management module for the bingo room.
//!
//! - `pattern` - Letter shapes A-Z
//! - `card` - Card layout and generation
//! - `draw` - Number draws without replacement
//! - `validate` - Claim validation against a letter shape
//! - `room` - Room aggregate, phases and public views
//! - `machine` - The state machine that applies requests to the room
//! - `protocol` - JSON request/response surface for a transport
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        RoomStateMachine                          │
//! │                                                                  │
//! │  ┌───────────────┐  ┌─────────────┐  ┌──────────────────────┐    │
//! │  │ CardGenerator │  │ DrawEngine  │  │     WinValidator     │    │
//! │  │               │  │             │  │                      │    │
//! │  │ rng → card    │  │ history →   │  │ card + history +     │    │
//! │  │               │  │   number    │  │ letter → bool        │    │
//! │  └───────────────┘  └─────────────┘  └──────────┬───────────┘    │
//! │                                                 │                │
//! │                                      ┌──────────▼───────────┐    │
//! │                                      │   pattern catalog    │    │
//! │                                      └──────────────────────┘    │
//! │                                                                  │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                          Room                              │  │
//! │  │   host binding · players · drawn numbers · phase · winner  │  │
//! │  │                                                            │  │
//! │  │        Waiting ──▶ Playing ──▶ Finished ──┐                │  │
//! │  │           ▲                               │ restart        │  │
//! │  │           └───────────────────────────────┘                │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use bingo_state::state::{RoomConfig, RoomStateMachine};
//!
//! let mut machine = RoomStateMachine::new(RoomConfig::default())?;
//! let host = machine.create_host("Ana", "session-1")?;
//! let player = machine.join_as_player("Luis", "session-2")?;
//! machine.start_game("session-1")?;
//! let drawn = machine.draw_number("session-1")?;
//! ```

pub mod card;
pub mod config;
pub mod draw;
pub mod error;
pub mod machine;
pub mod pattern;
pub mod protocol;
pub mod random;
pub mod room;
pub mod validate;

// Re-export commonly used types
pub use card::{BingoCard, BingoLetter, CardGenerator, Cell, Position, CARD_SIZE, CENTER};
pub use config::RoomConfig;
pub use draw::{BingoNumber, DrawEngine, MAX_NUMBER};
pub use error::{ErrorKind, RoomError};
pub use machine::{
    BingoClaim, CellMarked, HostCreated, NumberDrawn, PlayerJoined, PlayerReclaimed,
    RoomStateMachine,
};
pub use pattern::{get_pattern, is_valid_letter, Pattern};
pub use protocol::{ClientRequest, Delivery, ServerMessage, Target};
pub use random::{IdGenerator, SequentialIds, UuidIds};
pub use room::{PhaseEvent, Player, PublicPlayer, PublicRoomState, Room, RoomPhase};
pub use validate::WinValidator;
