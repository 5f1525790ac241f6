//! Terminal events for the collaborator broadcast layer
//!
//! The core emits these on a broadcast channel; relaying them to sockets
//! or UI stores is the surrounding application's job.

use serde::Serialize;

use crate::combat::resolution::CombatResult;
use crate::core::types::{CharacterId, CombatId};
use crate::leverage::bonus::BonusBreakdown;

/// Everything the core announces
#[derive(Debug, Clone, Serialize)]
pub enum GameEvent {
    CombatResolved {
        combat_id: CombatId,
        result: CombatResult,
    },
    CombatAborted {
        combat_id: CombatId,
    },
    LeverageRecalculated {
        character: CharacterId,
        total: f32,
        breakdown: BonusBreakdown,
    },
}

impl GameEvent {
    /// Short tag for logging
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::CombatResolved { .. } => "combat_resolved",
            GameEvent::CombatAborted { .. } => "combat_aborted",
            GameEvent::LeverageRecalculated { .. } => "leverage_recalculated",
        }
    }
}
