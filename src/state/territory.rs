//! Territory records
//!
//! Control is faction-level. Influence accumulates per faction after
//! combat; crossing the control threshold flips ownership.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, ResourceType, TerritoryId, Vec2};

/// A contestable map location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub controlled_by: Option<Faction>,
    /// Factions with an active claim (no duplicates)
    pub contested_by: Vec<Faction>,
    pub position: Vec2,
    /// Height above the reference plane, in world units
    pub elevation: f32,
    pub resources: Vec<ResourceType>,
    /// Accumulated influence per faction
    pub influence: AHashMap<Faction, f32>,
}

impl Territory {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: TerritoryId::new(),
            name: name.into(),
            controlled_by: None,
            contested_by: Vec::new(),
            position,
            elevation: 0.0,
            resources: Vec::new(),
            influence: AHashMap::new(),
        }
    }

    pub fn is_controlled_by(&self, faction: Faction) -> bool {
        self.controlled_by == Some(faction)
    }

    pub fn is_contested(&self) -> bool {
        !self.contested_by.is_empty()
    }

    pub fn is_contested_by(&self, faction: Faction) -> bool {
        self.contested_by.contains(&faction)
    }

    pub fn add_contestant(&mut self, faction: Faction) {
        if !self.contested_by.contains(&faction) {
            self.contested_by.push(faction);
        }
    }

    /// Credit influence toward a faction; flips control when the
    /// accumulated total crosses the threshold
    pub fn apply_influence(&mut self, faction: Faction, amount: f32, control_threshold: f32) {
        let total = self.influence.entry(faction).or_insert(0.0);
        *total += amount;

        if *total >= control_threshold && self.controlled_by != Some(faction) {
            self.controlled_by = Some(faction);
            self.contested_by.retain(|f| *f != faction);
            self.influence.clear();
        } else if self.controlled_by != Some(faction) {
            self.add_contestant(faction);
        }
    }
}
