//! Combat session state
//!
//! A session tracks two sides from initiation to a terminal state. State
//! transitions are monotonic: once a session resolves or aborts it never
//! re-enters an earlier state.

use serde::{Deserialize, Serialize};

use crate::combat::modifiers::CombatModifiers;
use crate::combat::stats::CombatStats;
use crate::core::error::{HiveError, Result};
use crate::core::types::{CharacterId, CombatId, Faction, TerritoryId};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Initiated,
    RoundActive,
    Resolved,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Resolved | SessionState::Aborted)
    }

    /// Position in the lifecycle; transitions must not decrease it
    fn rank(&self) -> u8 {
        match self {
            SessionState::Initiated => 0,
            SessionState::RoundActive => 1,
            SessionState::Resolved | SessionState::Aborted => 2,
        }
    }
}

/// Whether a hit landed normally or critically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Normal,
    Critical,
}

/// One logged hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Logical timestamp: the round the hit landed in
    pub round: u32,
    pub actor: CharacterId,
    pub damage: u32,
    pub kind: DamageKind,
}

/// One participant's encounter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSide {
    pub character: CharacterId,
    pub faction: Faction,
    pub stats: CombatStats,
    pub modifiers: CombatModifiers,
    /// Clamped at zero, never negative
    pub health: f32,
}

/// Territory facts captured at initiation for influence scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritoryContext {
    pub id: TerritoryId,
    pub contested: bool,
    /// Controlled by a faction that is neither participant's
    pub third_party: bool,
}

/// A running or finished encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSession {
    pub id: CombatId,
    pub attacker: CombatSide,
    pub defender: CombatSide,
    pub round: u32,
    pub state: SessionState,
    pub territory: Option<TerritoryContext>,
    pub log: Vec<CombatLogEntry>,
    /// Advisory pacing estimate in seconds; never scheduled against
    pub estimated_duration_secs: f32,
}

impl CombatSession {
    /// Enforced monotonic transition
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        if next.rank() <= self.state.rank() {
            return Err(HiveError::InvalidTransition(format!(
                "{:?} -> {:?}",
                self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Sum of all logged damage
    pub fn total_damage(&self) -> u64 {
        self.log.iter().map(|entry| entry.damage as u64).sum()
    }

    /// Record a hit and apply it to the target side's health
    pub fn log_hit(&mut self, actor_is_attacker: bool, damage: u32, kind: DamageKind) {
        let (actor, target) = if actor_is_attacker {
            (self.attacker.character, &mut self.defender)
        } else {
            (self.defender.character, &mut self.attacker)
        };

        target.health = (target.health - damage as f32).max(0.0);
        self.log.push(CombatLogEntry {
            round: self.round,
            actor,
            damage,
            kind,
        });
    }
}
