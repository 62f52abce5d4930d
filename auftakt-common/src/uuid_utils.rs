//! UUID utilities
//!
//! Every deck node (collection, card, asset) is identified by a random 128-bit
//! UUIDv4. Uniqueness is never checked; a collision is accepted as vanishingly rare.

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Source of fresh node identifiers
///
/// Deck materialization takes its identifiers from this capability instead of
/// calling `Uuid::new_v4` directly, so tests can substitute a predictable source.
pub trait IdSource {
    fn new_id(&mut self) -> Uuid;
}

/// Random UUIDv4 identifiers (production source)
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn new_id(&mut self) -> Uuid {
        generate()
    }
}

/// Sequential identifiers, for reproducible tests
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Starts at `00000000-0000-0000-0000-000000000001`
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn new_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next += 1;
        id
    }
}
