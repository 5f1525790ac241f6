//! Per-encounter modifier resolution
//!
//! Modifiers are multiplicative scalars resolved once at initiation, from
//! the attacker's point of view. The defender's set is resolved with roles
//! swapped and the reciprocal leverage term: relative advantage, not an
//! independent roll.

use serde::{Deserialize, Serialize};

use crate::state::character::Character;
use crate::state::territory::Territory;

/// Damage bonus for fighting on home ground
pub const CONTROLLED_TERRITORY_BONUS: f32 = 1.2;
/// Damage bonus for fighting over an actively claimed territory
pub const CONTESTED_TERRITORY_BONUS: f32 = 1.1;
/// Same-faction encounters deal half damage
pub const FRIENDLY_FIRE_DAMPENING: f32 = 0.5;

/// Multiplicative damage scalars for one side of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatModifiers {
    pub environmental: f32,
    pub territorial: f32,
    pub faction_bonus: f32,
    /// Reserved extension point; always 1.0 until equipment lands
    pub equipment_bonus: f32,
    pub leverage_multiplier: f32,
}

impl Default for CombatModifiers {
    fn default() -> Self {
        Self {
            environmental: 1.0,
            territorial: 1.0,
            faction_bonus: 1.0,
            equipment_bonus: 1.0,
            leverage_multiplier: 1.0,
        }
    }
}

impl CombatModifiers {
    /// Product of all situational scalars except leverage
    pub fn situational_product(&self) -> f32 {
        self.environmental * self.territorial * self.faction_bonus * self.equipment_bonus
    }
}

/// Resolve modifiers for the acting side
pub fn resolve_modifiers(
    actor: &Character,
    opponent: &Character,
    territory: Option<&Territory>,
    leverage_total: f32,
) -> CombatModifiers {
    let environmental = territory.map_or(1.0, |t| 1.0 + t.elevation / 100.0);

    let territorial = match territory {
        Some(t) if t.is_controlled_by(actor.faction) => CONTROLLED_TERRITORY_BONUS,
        Some(t) if t.is_contested_by(actor.faction) => CONTESTED_TERRITORY_BONUS,
        _ => 1.0,
    };

    let faction_bonus = if actor.faction == opponent.faction {
        FRIENDLY_FIRE_DAMPENING
    } else {
        1.0
    };

    let leverage_multiplier = if leverage_total.is_finite() && leverage_total > 0.0 {
        leverage_total
    } else {
        1.0
    };

    CombatModifiers {
        environmental,
        territorial,
        faction_bonus,
        equipment_bonus: 1.0,
        leverage_multiplier,
    }
}

/// The defender's leverage term: reciprocal of the attacker's total
pub fn reciprocal_leverage(attacker_total: f32) -> f32 {
    if attacker_total.is_finite() && attacker_total > 0.0 {
        1.0 / attacker_total
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Faction, Vec2};

    fn character(faction: Faction) -> Character {
        Character::new("fighter", faction)
    }

    #[test]
    fn test_no_territory_is_neutral() {
        let attacker = character(Faction::Sun);
        let defender = character(Faction::Ocean);
        let mods = resolve_modifiers(&attacker, &defender, None, 1.0);

        assert_eq!(mods, CombatModifiers::default());
    }

    #[test]
    fn test_elevation_drives_environmental() {
        let attacker = character(Faction::Sun);
        let defender = character(Faction::Ocean);
        let mut territory = Territory::new("Theta Mountains", Vec2::default());
        territory.elevation = 50.0;

        let mods = resolve_modifiers(&attacker, &defender, Some(&territory), 1.0);
        assert!((mods.environmental - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_home_ground_beats_contested() {
        let attacker = character(Faction::Sun);
        let defender = character(Faction::Ocean);
        let mut territory = Territory::new("Zeta Plains", Vec2::default());

        territory.controlled_by = Some(Faction::Sun);
        let home = resolve_modifiers(&attacker, &defender, Some(&territory), 1.0);
        assert!((home.territorial - 1.2).abs() < 1e-6);

        territory.controlled_by = Some(Faction::Ocean);
        territory.add_contestant(Faction::Sun);
        let contested = resolve_modifiers(&attacker, &defender, Some(&territory), 1.0);
        assert!((contested.territorial - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_friendly_fire_halved() {
        let attacker = character(Faction::Red);
        let defender = character(Faction::Red);
        let mods = resolve_modifiers(&attacker, &defender, None, 1.0);
        assert!((mods.faction_bonus - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reciprocal_leverage_guards_zero() {
        assert!((reciprocal_leverage(2.0) - 0.5).abs() < 1e-6);
        assert!((reciprocal_leverage(0.0) - 1.0).abs() < 1e-6);
        assert!((reciprocal_leverage(f32::NAN) - 1.0).abs() < 1e-6);
    }
}
