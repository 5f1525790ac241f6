//! Combat resolution state machine
//!
//! Initiated -> RoundActive -> Resolved, with Aborted reachable from either
//! non-terminal state. Rounds advance through an explicit step function so
//! any scheduler (real-time or test-driven) can drive the loop; a fixed
//! round cap guarantees termination even when damage per round is tiny.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::modifiers::{reciprocal_leverage, resolve_modifiers};
use crate::combat::rewards::RewardBundle;
use crate::combat::session::{
    CombatSession, CombatSide, DamageKind, SessionState, TerritoryContext,
};
use crate::combat::stats::{calculate_stats, CombatStats, BASE_SPEED};
use crate::core::config::EngineConfig;
use crate::core::error::{HiveError, Result};
use crate::core::types::{CharacterId, CombatId, Faction, TerritoryId};
use crate::state::character::Character;
use crate::state::territory::Territory;

/// Influence credited toward the winner's faction at a territory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritoryInfluence {
    pub territory: TerritoryId,
    pub amount: f32,
}

/// Terminal outcome of a resolved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub combat_id: CombatId,
    pub winner: CharacterId,
    pub loser: CharacterId,
    pub winner_faction: Faction,
    pub rounds: u32,
    /// Sum of every logged hit, both sides
    pub total_damage: u64,
    /// Filled in by the reward distributor after resolution
    pub rewards: Option<RewardBundle>,
    pub territory_influence: Option<TerritoryInfluence>,
    /// Set when the reward write could not be persisted; re-distribution
    /// is idempotent
    pub rewards_pending: bool,
}

/// What one round did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub attacker_damage: u32,
    /// None when the defender died before countering
    pub defender_damage: Option<u32>,
    pub finished: bool,
}

/// Drives sessions from initiation to a terminal outcome
#[derive(Debug, Clone)]
pub struct CombatEngine {
    config: EngineConfig,
}

impl CombatEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a session: derive stats and modifiers for both sides, seed
    /// health, estimate pacing, and enter RoundActive
    pub fn initiate(
        &self,
        attacker: &Character,
        defender: &Character,
        territory: Option<&Territory>,
        leverage_total: f32,
    ) -> Result<CombatSession> {
        let attacker_stats = calculate_stats(attacker);
        let defender_stats = calculate_stats(defender);

        let attacker_mods = resolve_modifiers(attacker, defender, territory, leverage_total);
        let defender_mods = resolve_modifiers(
            defender,
            attacker,
            territory,
            reciprocal_leverage(attacker_mods.leverage_multiplier),
        );

        let estimated_duration_secs = self.estimate_duration(&attacker_stats, &defender_stats);

        let territory_ctx = territory.map(|t| TerritoryContext {
            id: t.id,
            contested: t.is_contested(),
            third_party: matches!(
                t.controlled_by,
                Some(f) if f != attacker.faction && f != defender.faction
            ),
        });

        let mut session = CombatSession {
            id: CombatId::new(),
            attacker: CombatSide {
                character: attacker.id,
                faction: attacker.faction,
                stats: attacker_stats,
                modifiers: attacker_mods,
                health: self.config.starting_health,
            },
            defender: CombatSide {
                character: defender.id,
                faction: defender.faction,
                stats: defender_stats,
                modifiers: defender_mods,
                health: self.config.starting_health,
            },
            round: 0,
            state: SessionState::Initiated,
            territory: territory_ctx,
            log: Vec::new(),
            estimated_duration_secs,
        };

        session.transition(SessionState::RoundActive)?;
        tracing::debug!(
            combat = ?session.id,
            estimated_secs = estimated_duration_secs,
            "combat initiated"
        );
        Ok(session)
    }

    /// Advance one round: attacker strikes, then the defender if alive
    pub fn step_round(
        &self,
        session: &mut CombatSession,
        rng: &mut impl Rng,
    ) -> Result<RoundOutcome> {
        if session.state != SessionState::RoundActive {
            return Err(HiveError::InvalidTransition(format!(
                "step_round in {:?}",
                session.state
            )));
        }

        session.round += 1;
        let round = session.round;

        let (attacker_damage, kind) = roll_damage(&session.attacker, &session.defender, rng);
        session.log_hit(true, attacker_damage, kind);

        let defender_damage = if session.defender.health > 0.0 {
            let (damage, kind) = roll_damage(&session.defender, &session.attacker, rng);
            session.log_hit(false, damage, kind);
            Some(damage)
        } else {
            None
        };

        let finished = session.attacker.health <= 0.0
            || session.defender.health <= 0.0
            || round >= self.config.round_cap;

        if finished {
            session.transition(SessionState::Resolved)?;
        }

        Ok(RoundOutcome {
            round,
            attacker_damage,
            defender_damage,
            finished,
        })
    }

    /// Step until terminal; bounded by the round cap
    pub fn run_to_completion(
        &self,
        session: &mut CombatSession,
        rng: &mut impl Rng,
    ) -> Result<CombatResult> {
        while session.state == SessionState::RoundActive {
            self.step_round(session, rng)?;
        }
        self.resolve_result(session)
    }

    /// Terminate a non-terminal session with no outcome and no rewards
    pub fn abort(&self, session: &mut CombatSession) -> Result<()> {
        session.transition(SessionState::Aborted)?;
        tracing::debug!(combat = ?session.id, round = session.round, "combat aborted");
        Ok(())
    }

    /// Read the result of a resolved session
    ///
    /// Winner is the higher remaining-health side; the attacker takes
    /// ties at the round cap.
    pub fn resolve_result(&self, session: &CombatSession) -> Result<CombatResult> {
        if session.state != SessionState::Resolved {
            return Err(HiveError::InvalidTransition(format!(
                "result requested in {:?}",
                session.state
            )));
        }

        let attacker_won = session.attacker.health >= session.defender.health;
        let (winner_side, loser_side) = if attacker_won {
            (&session.attacker, &session.defender)
        } else {
            (&session.defender, &session.attacker)
        };

        let territory_influence = session.territory.map(|ctx| {
            let mut amount = 10.0 + session.round as f32 * 2.0;
            if session.round < 5 {
                amount *= 1.5;
            }
            if ctx.contested {
                amount *= 1.3;
            }
            if ctx.third_party {
                amount *= 0.7;
            }
            TerritoryInfluence {
                territory: ctx.id,
                amount,
            }
        });

        Ok(CombatResult {
            combat_id: session.id,
            winner: winner_side.character,
            loser: loser_side.character,
            winner_faction: winner_side.faction,
            rounds: session.round,
            total_damage: session.total_damage(),
            rewards: None,
            territory_influence,
            rewards_pending: false,
        })
    }

    /// Advisory pacing estimate from the relative stat blocks
    fn estimate_duration(&self, a: &CombatStats, b: &CombatStats) -> f32 {
        let attack_sum = (a.attack + b.attack).max(1.0);
        let defense_ratio = (a.defense + b.defense) / attack_sum;
        let speed_ratio = ((a.speed + b.speed) / (2.0 * BASE_SPEED)).max(0.1);

        (self.config.duration_scale * defense_ratio / speed_ratio).clamp(
            self.config.min_estimated_duration,
            self.config.max_estimated_duration,
        )
    }
}

/// One hit: leverage scales outgoing attack, half the target's defense
/// soaks, situational scalars multiply, minimum 1 damage
fn roll_damage(actor: &CombatSide, target: &CombatSide, rng: &mut impl Rng) -> (u32, DamageKind) {
    let crit = rng.gen::<f32>() < actor.stats.critical_chance;
    let (critical_factor, kind) = if crit {
        (actor.stats.critical_damage, DamageKind::Critical)
    } else {
        (1.0, DamageKind::Normal)
    };

    let m = &actor.modifiers;
    let raw = (actor.stats.attack * m.leverage_multiplier - target.stats.defense * 0.5)
        * m.situational_product()
        * critical_factor;

    let damage = if raw.is_finite() {
        raw.max(1.0).floor() as u32
    } else {
        1
    };

    (damage, kind)
}
