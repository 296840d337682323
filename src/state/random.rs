//! Randomness and identifier sources.
//!
//! Card shuffling and draws take any [`rand::RngCore`], so tests can pass a
//! seeded `StdRng`. Identifiers (card ids, player ids, secrets) come from an
//! [`IdGenerator`].

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Boxed random source owned by the room state machine.
pub type BoxedRng = Box<dyn RngCore + Send>;

/// Create an OS-seeded random source.
pub fn os_rng() -> BoxedRng {
    Box::new(StdRng::from_os_rng())
}

/// Create a deterministic random source.
pub fn seeded_rng(seed: u64) -> BoxedRng {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Produces opaque identifiers and bearer secrets.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Predictable `prefix-N` identifiers, for tests and replays.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
