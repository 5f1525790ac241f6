//! Session registry
//!
//! Owns every running combat session and the only write path to shared
//! character/territory records. Sessions advance independently behind
//! per-session locks; record writes go through compare-and-swap with a
//! bounded retry budget, so lost updates cannot occur. Reward persistence
//! failure never fails the combat: the result comes back marked
//! `rewards_pending` and distribution can be retried idempotently.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::combat::resolution::{CombatEngine, CombatResult, RoundOutcome};
use crate::combat::rewards::RewardDistributor;
use crate::combat::session::{CombatSession, SessionState};
use crate::core::config::EngineConfig;
use crate::core::error::{HiveError, Result};
use crate::core::types::{CharacterId, CombatId, TerritoryId};
use crate::engine::events::GameEvent;
use crate::leverage::aggregator::LeverageAggregator;
use crate::leverage::bonus::LeverageMultiplier;
use crate::state::character::Character;
use crate::state::repository::{CasOutcome, RecordStore};
use crate::state::snapshot::{GameStateSnapshot, SnapshotProvider};
use crate::state::territory::Territory;

/// Buffered terminal events before slow subscribers start lagging
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Public API surface over concurrent combat sessions
pub struct SessionRegistry {
    engine: CombatEngine,
    aggregator: LeverageAggregator,
    characters: Arc<dyn RecordStore<CharacterId, Character>>,
    territories: Arc<dyn RecordStore<TerritoryId, Territory>>,
    snapshots: Arc<dyn SnapshotProvider>,
    sessions: RwLock<AHashMap<CombatId, Arc<Mutex<CombatSession>>>>,
    distributor: Mutex<RewardDistributor>,
    /// Combats whose reward deltas reached the record stores
    applied: std::sync::Mutex<AHashSet<CombatId>>,
    events: broadcast::Sender<GameEvent>,
    master_rng: std::sync::Mutex<ChaCha8Rng>,
}

impl SessionRegistry {
    pub fn new(
        config: EngineConfig,
        characters: Arc<dyn RecordStore<CharacterId, Character>>,
        territories: Arc<dyn RecordStore<TerritoryId, Territory>>,
        snapshots: Arc<dyn SnapshotProvider>,
        seed: u64,
    ) -> Result<Self> {
        let engine = CombatEngine::new(config)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            engine,
            aggregator: LeverageAggregator::new(),
            characters,
            territories,
            snapshots,
            sessions: RwLock::new(AHashMap::new()),
            distributor: Mutex::new(RewardDistributor::new()),
            applied: std::sync::Mutex::new(AHashSet::new()),
            events,
            master_rng: std::sync::Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        })
    }

    /// Subscribe to terminal events
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Score a snapshot and announce the new multiplier
    pub fn calculate_leverage(&self, snapshot: &GameStateSnapshot) -> Result<LeverageMultiplier> {
        let multiplier = self.aggregator.calculate(snapshot)?;
        self.emit(GameEvent::LeverageRecalculated {
            character: snapshot.character.id,
            total: multiplier.total,
            breakdown: multiplier.bonuses.clone(),
        });
        Ok(multiplier)
    }

    /// Open a new session between two characters
    ///
    /// The attacker's leverage is pulled from the snapshot provider;
    /// unknown references are rejected before any state is created.
    pub async fn initiate_combat(
        &self,
        attacker: CharacterId,
        defender: CharacterId,
        territory: Option<TerritoryId>,
    ) -> Result<CombatId> {
        let attacker_record = self.read_character(attacker)?;
        let defender_record = self.read_character(defender)?;
        let territory_record = match territory {
            Some(id) => Some(
                self.territories
                    .read(&id)
                    .ok_or(HiveError::TerritoryNotFound(id))?,
            ),
            None => None,
        };

        let snapshot = self.snapshots.snapshot(attacker)?;
        let leverage = self.aggregator.calculate(&snapshot)?;

        let session = self.engine.initiate(
            &attacker_record.value,
            &defender_record.value,
            territory_record.as_ref().map(|r| &r.value),
            leverage.total,
        )?;
        let combat_id = session.id;

        self.sessions
            .write()
            .await
            .insert(combat_id, Arc::new(Mutex::new(session)));

        tracing::info!(?combat_id, ?attacker, ?defender, leverage = leverage.total, "combat initiated");
        Ok(combat_id)
    }

    /// Advance one round of a session
    pub async fn step_round(&self, combat_id: CombatId) -> Result<RoundOutcome> {
        let handle = self.session_handle(combat_id).await?;
        let mut session = handle.lock().await;

        let mut rng = self.session_rng();
        let outcome = self.engine.step_round(&mut session, &mut rng)?;

        if outcome.finished {
            self.finalize(&mut session).await?;
        }
        Ok(outcome)
    }

    /// Drive a session to its terminal outcome
    pub async fn run_to_completion(&self, combat_id: CombatId) -> Result<CombatResult> {
        let handle = self.session_handle(combat_id).await?;
        let mut session = handle.lock().await;

        let mut rng = self.session_rng();
        while session.state == SessionState::RoundActive {
            self.engine.step_round(&mut session, &mut rng)?;
        }

        self.finalize(&mut session).await
    }

    /// Abort a non-terminal session; no rewards, no partial application
    pub async fn abort_combat(&self, combat_id: CombatId) -> Result<()> {
        let handle = self.session_handle(combat_id).await?;
        let mut session = handle.lock().await;

        self.engine.abort(&mut session)?;
        self.emit(GameEvent::CombatAborted { combat_id });
        Ok(())
    }

    /// Snapshot of a session's current state
    pub async fn get_session(&self, combat_id: CombatId) -> Option<CombatSession> {
        let handle = self.sessions.read().await.get(&combat_id).cloned()?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Resolve the session and apply rewards through the record stores
    async fn finalize(&self, session: &mut CombatSession) -> Result<CombatResult> {
        let mut result = self.engine.resolve_result(session)?;

        let winner_record = self.read_character(result.winner)?;
        let territory_record = session
            .territory
            .and_then(|ctx| self.territories.read(&ctx.id));

        let mut distributor = self.distributor.lock().await;
        let fresh = !distributor.is_distributed(result.combat_id);
        let bundle = distributor.distribute(
            &result,
            session.log.len(),
            &winner_record.value.traits,
            territory_record.as_ref().map(|r| &r.value),
        );
        drop(distributor);

        // The bundle computation is idempotent; the record-store writes
        // happen at most once. A failed write leaves the result marked
        // pending and a later finalize retries the application.
        let already_applied = self
            .applied
            .lock()
            .map(|set| set.contains(&result.combat_id))
            .unwrap_or(false);
        if !already_applied {
            match self.persist_rewards(&result, &bundle).await {
                Ok(()) => {
                    if let Ok(mut set) = self.applied.lock() {
                        set.insert(result.combat_id);
                    }
                }
                Err(error) => {
                    tracing::warn!(combat = ?result.combat_id, %error, "reward persistence failed");
                    result.rewards_pending = true;
                }
            }
        }

        result.rewards = Some(bundle);
        if fresh {
            self.emit(GameEvent::CombatResolved {
                combat_id: result.combat_id,
                result: result.clone(),
            });
        }
        tracing::info!(
            combat = ?result.combat_id,
            winner = ?result.winner,
            rounds = result.rounds,
            pending = result.rewards_pending,
            "combat resolved"
        );
        Ok(result)
    }

    /// Write reward deltas to the shared records
    async fn persist_rewards(
        &self,
        result: &CombatResult,
        bundle: &crate::combat::rewards::RewardBundle,
    ) -> Result<()> {
        self.update_character(result.winner, |character| bundle.apply_winner(character))?;
        self.update_character(result.loser, |character| bundle.apply_loser(character))?;

        if let Some(influence) = result.territory_influence {
            let threshold = self.engine.config().control_threshold;
            let faction = result.winner_faction;
            self.update_territory(influence.territory, move |territory| {
                territory.apply_influence(faction, influence.amount, threshold);
            })?;
        }
        Ok(())
    }

    /// Read-modify-CAS loop for a character record
    fn update_character<F>(&self, id: CharacterId, mutate: F) -> Result<()>
    where
        F: Fn(&mut Character),
    {
        let attempts = self.engine.config().cas_retry_limit;
        for _ in 0..attempts {
            let record = self.read_character(id)?;
            let mut value = record.value;
            mutate(&mut value);
            match self.characters.compare_and_swap(&id, record.version, value)? {
                CasOutcome::Committed(_) => return Ok(()),
                CasOutcome::Conflict(_) => continue,
            }
        }
        Err(HiveError::ConcurrencyConflict {
            record: format!("character {id:?}"),
            attempts,
        })
    }

    /// Read-modify-CAS loop for a territory record
    fn update_territory<F>(&self, id: TerritoryId, mutate: F) -> Result<()>
    where
        F: Fn(&mut Territory),
    {
        let attempts = self.engine.config().cas_retry_limit;
        for _ in 0..attempts {
            let record = self
                .territories
                .read(&id)
                .ok_or(HiveError::TerritoryNotFound(id))?;
            let mut value = record.value;
            mutate(&mut value);
            match self
                .territories
                .compare_and_swap(&id, record.version, value)?
            {
                CasOutcome::Committed(_) => return Ok(()),
                CasOutcome::Conflict(_) => continue,
            }
        }
        Err(HiveError::ConcurrencyConflict {
            record: format!("territory {id:?}"),
            attempts,
        })
    }

    fn read_character(
        &self,
        id: CharacterId,
    ) -> Result<crate::state::repository::Versioned<Character>> {
        self.characters
            .read(&id)
            .ok_or(HiveError::CharacterNotFound(id))
    }

    async fn session_handle(&self, combat_id: CombatId) -> Result<Arc<Mutex<CombatSession>>> {
        self.sessions
            .read()
            .await
            .get(&combat_id)
            .cloned()
            .ok_or(HiveError::SessionNotFound(combat_id))
    }

    /// Independent per-call stream seeded off the master RNG
    fn session_rng(&self) -> ChaCha8Rng {
        let seed = match self.master_rng.lock() {
            Ok(mut master) => master.gen(),
            // Poisoned master: fall back to a fixed stream rather than panic
            Err(_) => 0,
        };
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn emit(&self, event: GameEvent) {
        tracing::debug!(kind = event.kind(), "event emitted");
        // Send only fails when nobody is subscribed, which is fine
        let _ = self.events.send(event);
    }
}
