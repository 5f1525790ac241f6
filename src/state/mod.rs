pub mod character;
pub mod repository;
pub mod snapshot;
pub mod territory;

pub use character::{Character, Trait, TraitType};
pub use repository::{CasOutcome, InMemoryStore, RecordStore, Versioned};
pub use snapshot::{GameStateSnapshot, InMemorySnapshots, SnapshotProvider};
pub use territory::Territory;
