//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for territories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerritoryId(pub Uuid);

impl TerritoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TerritoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for combat sessions
///
/// Doubles as the idempotence key for reward distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatId(pub Uuid);

impl CombatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatId {
    fn default() -> Self {
        Self::new()
    }
}

/// Faction enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Sun,
    Ocean,
    Forest,
    Red,
    Blue,
    Green,
}

impl Faction {
    pub fn name(&self) -> &'static str {
        match self {
            Faction::Sun => "Sun",
            Faction::Ocean => "Ocean",
            Faction::Forest => "Forest",
            Faction::Red => "Red",
            Faction::Blue => "Blue",
            Faction::Green => "Green",
        }
    }
}

/// Harvestable resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Energy,
    Minerals,
    Crystals,
    Gas,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Energy,
        ResourceType::Minerals,
        ResourceType::Crystals,
        ResourceType::Gas,
    ];
}

/// 2D world position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_uniqueness() {
        let a = CharacterId::new();
        let b = CharacterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashMap;
        let id = TerritoryId::new();
        let mut map: HashMap<TerritoryId, &str> = HashMap::new();
        map.insert(id, "alpha");
        assert_eq!(map.get(&id), Some(&"alpha"));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < f32::EPSILON);
    }
}
