//! Character records
//!
//! Characters level deterministically from experience. Trait types are
//! unique per character; adding experience to an absent trait creates it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{CharacterId, Faction, ResourceType, Vec2};

/// Experience required per character (and trait) level
pub const EXPERIENCE_PER_LEVEL: u64 = 1000;

/// Named, leveled character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitType {
    Strength,
    Agility,
    Wisdom,
    Intelligence,
    Charisma,
}

impl TraitType {
    pub const ALL: [TraitType; 5] = [
        TraitType::Strength,
        TraitType::Agility,
        TraitType::Wisdom,
        TraitType::Intelligence,
        TraitType::Charisma,
    ];

    /// Traits that gain experience from combat outcomes (closed subset)
    pub fn is_combat_relevant(&self) -> bool {
        matches!(self, TraitType::Strength | TraitType::Agility)
    }
}

/// A single leveled trait
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub trait_type: TraitType,
    pub level: u32,
    pub experience: u64,
}

impl Trait {
    pub fn new(trait_type: TraitType, level: u32) -> Self {
        Self {
            trait_type,
            level,
            experience: (level.saturating_sub(1) as u64) * EXPERIENCE_PER_LEVEL,
        }
    }
}

/// Level implied by an experience total: floor(xp / 1000) + 1
pub fn level_for_experience(experience: u64) -> u32 {
    (experience / EXPERIENCE_PER_LEVEL) as u32 + 1
}

/// A playable character record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub faction: Faction,
    pub level: u32,
    pub experience: u64,
    /// Ordered; trait types unique (insertion order preserved)
    pub traits: Vec<Trait>,
    pub resources: AHashMap<ResourceType, u64>,
    pub position: Vec2,
}

impl Character {
    pub fn new(name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            faction,
            level: 1,
            experience: 0,
            traits: Vec::new(),
            resources: AHashMap::new(),
            position: Vec2::default(),
        }
    }

    /// Level of a trait, zero when absent
    pub fn trait_level(&self, trait_type: TraitType) -> u32 {
        self.traits
            .iter()
            .find(|t| t.trait_type == trait_type)
            .map_or(0, |t| t.level)
    }

    pub fn has_trait(&self, trait_type: TraitType) -> bool {
        self.traits.iter().any(|t| t.trait_type == trait_type)
    }

    /// Add a trait at the given level, replacing any existing entry of the
    /// same type (keeps the uniqueness invariant)
    pub fn set_trait(&mut self, trait_type: TraitType, level: u32) {
        if let Some(existing) = self.traits.iter_mut().find(|t| t.trait_type == trait_type) {
            *existing = Trait::new(trait_type, level);
        } else {
            self.traits.push(Trait::new(trait_type, level));
        }
    }

    /// Credit experience and re-derive the level
    pub fn add_experience(&mut self, amount: u64) {
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_experience(self.experience);
    }

    /// Credit experience to a trait, creating it at level 1 if absent
    pub fn add_trait_experience(&mut self, trait_type: TraitType, amount: u64) {
        if !self.has_trait(trait_type) {
            self.traits.push(Trait::new(trait_type, 1));
        }
        if let Some(entry) = self.traits.iter_mut().find(|t| t.trait_type == trait_type) {
            entry.experience = entry.experience.saturating_add(amount);
            entry.level = level_for_experience(entry.experience);
        }
    }

    pub fn add_resource(&mut self, resource: ResourceType, amount: u64) {
        *self.resources.entry(resource).or_insert(0) += amount;
    }

    /// Count of resource types with a positive balance
    pub fn unique_resource_types(&self) -> usize {
        self.resources.values().filter(|amount| **amount > 0).count()
    }

    /// Total units held across all resource types
    pub fn total_resources(&self) -> u64 {
        self.resources.values().sum()
    }
}
