//! Reward distribution
//!
//! Converts a terminal combat result into experience, resource, and trait
//! deltas. Distribution is idempotent per combat id: the persistence
//! collaborator may retry delivery, so a repeated call returns the cached
//! bundle and mutates nothing.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::resolution::{CombatResult, TerritoryInfluence};
use crate::core::types::{CharacterId, CombatId, ResourceType};
use crate::state::character::{Character, Trait, TraitType};
use crate::state::territory::Territory;

/// Flat experience for surviving an encounter
pub const BASE_EXPERIENCE: u64 = 100;
/// Additional experience per round fought
pub const EXPERIENCE_PER_ROUND: u64 = 10;
/// Experience scale per combat-log entry
pub const LOG_SCALE_PER_ENTRY: f32 = 0.05;
/// Loser's share of the winner's experience
pub const LOSER_SHARE: f32 = 0.25;
/// Resource units credited per 10 points of total damage
pub const DAMAGE_PER_RESOURCE_UNIT: u64 = 10;
/// Flat trait experience for a combat-relevant trait
pub const TRAIT_BASE_GAIN: u64 = 10;
/// Per-round trait experience
pub const TRAIT_GAIN_PER_ROUND: u64 = 2;

/// The deltas one combat produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBundle {
    pub combat_id: CombatId,
    pub winner: CharacterId,
    pub loser: CharacterId,
    pub winner_experience: u64,
    pub loser_experience: u64,
    /// Credited to the winner
    pub resources: AHashMap<ResourceType, u64>,
    /// Trait experience for the winner's combat-relevant traits
    pub trait_gains: AHashMap<TraitType, u64>,
    pub territory_influence: Option<TerritoryInfluence>,
}

impl RewardBundle {
    /// Apply the winner's share to a character record
    pub fn apply_winner(&self, character: &mut Character) {
        character.add_experience(self.winner_experience);
        for (resource, amount) in &self.resources {
            character.add_resource(*resource, *amount);
        }
        for (trait_type, gain) in &self.trait_gains {
            character.add_trait_experience(*trait_type, *gain);
        }
    }

    /// Apply the loser's share to a character record
    pub fn apply_loser(&self, character: &mut Character) {
        character.add_experience(self.loser_experience);
    }
}

/// Idempotent converter from combat results to reward bundles
#[derive(Debug, Default)]
pub struct RewardDistributor {
    distributed: AHashMap<CombatId, RewardBundle>,
}

impl RewardDistributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a combat id has already been distributed
    pub fn is_distributed(&self, combat_id: CombatId) -> bool {
        self.distributed.contains_key(&combat_id)
    }

    /// Compute the bundle for a result, or return the cached one
    ///
    /// `winner_traits` selects which combat-relevant traits gain; the
    /// territory (when present) selects the resource type paid out.
    pub fn distribute(
        &mut self,
        result: &CombatResult,
        log_entries: usize,
        winner_traits: &[Trait],
        territory: Option<&Territory>,
    ) -> RewardBundle {
        if let Some(cached) = self.distributed.get(&result.combat_id) {
            tracing::debug!(combat = ?result.combat_id, "reward distribution replayed");
            return cached.clone();
        }

        let base = BASE_EXPERIENCE + result.rounds as u64 * EXPERIENCE_PER_ROUND;
        let scale = 1.0 + log_entries as f32 * LOG_SCALE_PER_ENTRY;
        let winner_experience = (base as f32 * scale).floor() as u64;
        let loser_experience = (winner_experience as f32 * LOSER_SHARE).floor() as u64;

        let mut resources = AHashMap::new();
        let payout = result.total_damage / DAMAGE_PER_RESOURCE_UNIT;
        if payout > 0 {
            let resource = territory
                .and_then(|t| t.resources.first().copied())
                .unwrap_or(ResourceType::Energy);
            resources.insert(resource, payout);
        }

        let mut trait_gains = AHashMap::new();
        let gain = TRAIT_BASE_GAIN + result.rounds as u64 * TRAIT_GAIN_PER_ROUND;
        for t in winner_traits {
            if t.trait_type.is_combat_relevant() {
                trait_gains.insert(t.trait_type, gain);
            }
        }

        let bundle = RewardBundle {
            combat_id: result.combat_id,
            winner: result.winner,
            loser: result.loser,
            winner_experience,
            loser_experience,
            resources,
            trait_gains,
            territory_influence: result.territory_influence,
        };

        self.distributed.insert(result.combat_id, bundle.clone());
        tracing::debug!(
            combat = ?result.combat_id,
            winner_experience,
            "rewards distributed"
        );
        bundle
    }
}
