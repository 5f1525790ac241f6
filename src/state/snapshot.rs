//! Game-state snapshots
//!
//! A snapshot is the read-only, pull-based view of everything the leverage
//! aggregator scores: territories, resources, missions, achievements,
//! social standing, research, and combat history. Collaborator layers
//! assemble it; the core never writes through it.

use serde::{Deserialize, Serialize};

use crate::core::error::{HiveError, Result};
use crate::core::types::CharacterId;
use crate::state::character::Character;
use crate::state::territory::Territory;

/// A mission as the aggregator sees it: identity plus progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub id: String,
    /// 0–100; 100 means completed
    pub progress: f32,
}

impl MissionRecord {
    pub fn is_completed(&self) -> bool {
        self.progress >= 100.0
    }

    pub fn is_active(&self) -> bool {
        self.progress > 0.0 && self.progress < 100.0
    }
}

/// Alliance and reputation signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialStanding {
    pub alliance_size: u32,
}

/// Completed research entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub completed: Vec<String>,
}

/// Prior combat performance
///
/// The rating is maintained by the history collaborator
/// (wins*25 - losses*10, floored at zero); the aggregator consumes it
/// as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatHistory {
    pub rating: f32,
    pub wins: u32,
    pub losses: u32,
}

/// Everything the leverage aggregator scores for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub character: Character,
    pub territories: Vec<Territory>,
    pub missions: Vec<MissionRecord>,
    pub achievements: Vec<String>,
    pub social: SocialStanding,
    pub research: ResearchState,
    pub combat_history: CombatHistory,
}

impl GameStateSnapshot {
    /// Minimal snapshot around a character; every category empty
    pub fn for_character(character: Character) -> Self {
        Self {
            character,
            territories: Vec::new(),
            missions: Vec::new(),
            achievements: Vec::new(),
            social: SocialStanding::default(),
            research: ResearchState::default(),
            combat_history: CombatHistory::default(),
        }
    }

    /// Reject structurally broken snapshots before any scoring
    ///
    /// Empty categories are fine; out-of-domain numbers are not.
    pub fn validate(&self) -> Result<()> {
        if self.character.level == 0 {
            return Err(HiveError::MalformedSnapshot(
                "character level must be at least 1".into(),
            ));
        }

        if let Some(mission) = self
            .missions
            .iter()
            .find(|m| !m.progress.is_finite() || m.progress < 0.0 || m.progress > 100.0)
        {
            return Err(HiveError::MalformedSnapshot(format!(
                "mission {} has progress outside [0, 100]",
                mission.id
            )));
        }

        Ok(())
    }
}

/// Pull-based snapshot source consumed by the registry
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self, character: CharacterId) -> Result<GameStateSnapshot>;
}

/// Map-backed provider for tests and the demo harness
#[derive(Debug, Default)]
pub struct InMemorySnapshots {
    snapshots: std::sync::RwLock<ahash::AHashMap<CharacterId, GameStateSnapshot>>,
}

impl InMemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, snapshot: GameStateSnapshot) {
        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.insert(snapshot.character.id, snapshot);
        }
    }
}

impl SnapshotProvider for InMemorySnapshots {
    fn snapshot(&self, character: CharacterId) -> Result<GameStateSnapshot> {
        self.snapshots
            .read()
            .ok()
            .and_then(|snapshots| snapshots.get(&character).cloned())
            .ok_or(HiveError::CharacterNotFound(character))
    }
}
