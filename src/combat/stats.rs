//! Combat stat derivation
//!
//! Stats are derived from the character snapshot at encounter start and
//! never persisted. Pure function; absent traits contribute nothing.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::state::character::{Character, TraitType};

// Base stat block
pub const BASE_ATTACK: f32 = 10.0;
pub const BASE_DEFENSE: f32 = 10.0;
pub const BASE_SPEED: f32 = 10.0;
pub const BASE_CRIT_CHANCE: f32 = 0.05;
pub const BASE_CRIT_DAMAGE: f32 = 1.5;

// Flat equipment placeholder until the equipment system lands
pub const EQUIPMENT_ATTACK: f32 = 10.0;
pub const EQUIPMENT_DEFENSE: f32 = 10.0;

// Per-trait-level contributions
pub const STRENGTH_ATTACK_PER_LEVEL: f32 = 5.0;
pub const STRENGTH_DEFENSE_PER_LEVEL: f32 = 2.0;
pub const AGILITY_SPEED_PER_LEVEL: f32 = 3.0;
pub const AGILITY_CRIT_PER_LEVEL: f32 = 0.02;
pub const WISDOM_INSIGHT_PER_LEVEL: f32 = 0.05;
pub const INTELLIGENCE_FOCUS_PER_LEVEL: f32 = 0.04;
pub const CHARISMA_RALLY_PER_LEVEL: f32 = 0.03;

/// Derived combat stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// Probability of a critical hit, 0-1
    pub critical_chance: f32,
    /// Damage multiplier on a critical hit
    pub critical_damage: f32,
    /// Ability name to bonus magnitude
    pub special_abilities: AHashMap<String, f32>,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: BASE_ATTACK,
            defense: BASE_DEFENSE,
            speed: BASE_SPEED,
            critical_chance: BASE_CRIT_CHANCE,
            critical_damage: BASE_CRIT_DAMAGE,
            special_abilities: AHashMap::new(),
        }
    }
}

/// Derive a stat block from a character
pub fn calculate_stats(character: &Character) -> CombatStats {
    let mut stats = CombatStats::default();

    stats.attack += EQUIPMENT_ATTACK;
    stats.defense += EQUIPMENT_DEFENSE;

    let strength = character.trait_level(TraitType::Strength) as f32;
    stats.attack += strength * STRENGTH_ATTACK_PER_LEVEL;
    stats.defense += strength * STRENGTH_DEFENSE_PER_LEVEL;

    let agility = character.trait_level(TraitType::Agility) as f32;
    stats.speed += agility * AGILITY_SPEED_PER_LEVEL;
    stats.critical_chance = (stats.critical_chance + agility * AGILITY_CRIT_PER_LEVEL).min(1.0);

    let wisdom = character.trait_level(TraitType::Wisdom) as f32;
    if wisdom > 0.0 {
        stats
            .special_abilities
            .insert("tactical_insight".into(), wisdom * WISDOM_INSIGHT_PER_LEVEL);
    }

    let intelligence = character.trait_level(TraitType::Intelligence) as f32;
    if intelligence > 0.0 {
        stats
            .special_abilities
            .insert("focus_fire".into(), intelligence * INTELLIGENCE_FOCUS_PER_LEVEL);
    }

    let charisma = character.trait_level(TraitType::Charisma) as f32;
    if charisma > 0.0 {
        stats
            .special_abilities
            .insert("rally".into(), charisma * CHARISMA_RALLY_PER_LEVEL);
    }

    stats
}
