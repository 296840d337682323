//! Bingo State Library
//!
//! This crate provides the game-state engine for a single shared bingo room.
//!
//! # Overview
//!
//! One host draws numbers, players hold generated cards and mark cells, and a
//! win is certified against a letter-shaped pattern (A-Z).
//!
//! - **Room State Machine** - Host and player lifecycle with guarded phase
//!   transitions (waiting, playing, finished).
//!
//! - **Cards** - 5x5 cards with disjoint column ranges and a free centre.
//!
//! - **Draws** - Numbers 1-75 without replacement.
//!
//! - **Win Validation** - A claim wins only if every cell of the selected letter
//!   is marked and backed by a drawn number.
//!
//! - **Protocol** - JSON requests in, unicast/broadcast deliveries out.
//!
//! # Design Principles
//!
//! 1. **Guards before mutation** - A rejected request never changes the room.
//!
//! 2. **No networking** - This crate is pure state; the transport maps sessions
//!    to connections.
//!
//! 3. **Injectable randomness** - Card shuffles, draws and ids come from sources
//!    passed in, so games can be replayed in tests.
//!
//! 4. **Secrets stay private** - Broadcast views never carry secrets or cards.
//!
//! # Example
//!
//! ```rust
//! use bingo_state::state::{
//!     random::{seeded_rng, SequentialIds},
//!     RoomConfig, RoomPhase, RoomStateMachine,
//! };
//!
//! let mut machine = RoomStateMachine::with_sources(
//!     RoomConfig::default(),
//!     seeded_rng(1),
//!     Box::new(SequentialIds::default()),
//! )
//! .unwrap();
//!
//! machine.create_host("Ana", "session-ana").unwrap();
//! let joined = machine.join_as_player("Luis", "session-luis").unwrap();
//! machine.start_game("session-ana").unwrap();
//!
//! let drawn = machine.draw_number("session-ana").unwrap();
//! assert_eq!(drawn.room.drawn_numbers.len(), 1);
//!
//! let claim = machine.claim_bingo("session-luis", Some("O")).unwrap();
//! assert!(!claim.valid);
//! assert_eq!(claim.player_id, joined.player_id);
//! assert_eq!(machine.room().phase, RoomPhase::Playing);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
