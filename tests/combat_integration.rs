//! Combat system integration tests
//!
//! End-to-end checks of the resolution state machine against the reference
//! scenarios: the damage ladder, friendly-fire dampening, termination, and
//! reward idempotence.

use rand::rngs::mock::StepRng;

use hexhive::combat::resolution::CombatEngine;
use hexhive::combat::rewards::RewardDistributor;
use hexhive::combat::session::SessionState;
use hexhive::core::config::EngineConfig;
use hexhive::core::types::{Faction, Vec2};
use hexhive::state::character::{Character, TraitType};
use hexhive::state::territory::Territory;

/// RNG that never rolls a critical
fn no_crit_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn engine() -> CombatEngine {
    CombatEngine::new(EngineConfig::default()).expect("default config is valid")
}

fn attacker() -> Character {
    // attack 35, defense 26
    let mut c = Character::new("Vex", Faction::Sun);
    c.set_trait(TraitType::Strength, 3);
    c
}

fn defender() -> Character {
    // attack 25, defense 22
    let mut c = Character::new("Korr", Faction::Ocean);
    c.set_trait(TraitType::Strength, 1);
    c
}

/// Reference scenario: 24 and 12 damage alternate until the defender dies
/// in round 5 without countering.
#[test]
fn test_reference_damage_ladder() {
    let engine = engine();
    let mut session = engine
        .initiate(&attacker(), &defender(), None, 1.0)
        .unwrap();
    let mut rng = no_crit_rng();

    for _ in 1..=4 {
        let outcome = engine.step_round(&mut session, &mut rng).unwrap();
        assert_eq!(outcome.attacker_damage, 24);
        assert_eq!(outcome.defender_damage, Some(12));
    }
    assert!((session.defender.health - 4.0).abs() < 1e-3);
    assert!((session.attacker.health - 52.0).abs() < 1e-3);

    let last = engine.step_round(&mut session, &mut rng).unwrap();
    assert!(last.finished);
    assert_eq!(last.defender_damage, None);

    let result = engine.resolve_result(&session).unwrap();
    assert_eq!(result.winner, session.attacker.character);
    assert_eq!(result.rounds, 5);
    assert_eq!(result.total_damage, (24 * 5 + 12 * 4) as u64);
    assert_eq!(session.log.len(), 9);
}

/// Same-faction damage is exactly half of the cross-faction figure on
/// both sides of the exchange.
#[test]
fn test_friendly_fire_exactly_halves_damage() {
    let engine = engine();

    let mut cross = engine
        .initiate(&attacker(), &defender(), None, 1.0)
        .unwrap();
    let cross_outcome = engine.step_round(&mut cross, &mut no_crit_rng()).unwrap();

    let mut same_defender = defender();
    same_defender.faction = Faction::Sun;
    let mut same = engine
        .initiate(&attacker(), &same_defender, None, 1.0)
        .unwrap();
    let same_outcome = engine.step_round(&mut same, &mut no_crit_rng()).unwrap();

    assert_eq!(cross_outcome.attacker_damage, 24);
    assert_eq!(same_outcome.attacker_damage, 12);
    assert_eq!(cross_outcome.defender_damage, Some(12));
    assert_eq!(same_outcome.defender_damage, Some(6));
}

/// Every session terminates at the round cap even when neither side can
/// break through.
#[test]
fn test_termination_at_round_cap() {
    let engine = engine();
    let a = Character::new("a", Faction::Sun);
    let b = Character::new("b", Faction::Ocean);

    // Base stats trade 10 damage per round; at 100 starting health the
    // defender dies in round 10, well inside the cap
    let mut session = engine.initiate(&a, &b, None, 1.0).unwrap();
    let result = engine
        .run_to_completion(&mut session, &mut no_crit_rng())
        .unwrap();
    assert!(result.rounds <= engine.config().round_cap);
    assert_eq!(session.state, SessionState::Resolved);

    // A tight cap with matched sides resolves by remaining health
    let capped = CombatEngine::new(EngineConfig {
        round_cap: 3,
        ..EngineConfig::default()
    })
    .unwrap();
    let mut stalemate = capped.initiate(&a, &b, None, 1.0).unwrap();
    let result = capped
        .run_to_completion(&mut stalemate, &mut no_crit_rng())
        .unwrap();
    assert_eq!(result.rounds, 3);
    assert!(stalemate.attacker.health > 0.0 && stalemate.defender.health > 0.0);
}

/// Health never goes negative and damage never drops below 1.
#[test]
fn test_health_floor_and_minimum_damage() {
    let engine = engine();
    let weak = Character::new("weak", Faction::Sun);
    let tough = attacker();

    let mut session = engine.initiate(&weak, &tough, None, 0.01).unwrap();
    let result = engine
        .run_to_completion(&mut session, &mut no_crit_rng())
        .unwrap();

    assert!(session.attacker.health >= 0.0);
    assert!(session.defender.health >= 0.0);
    assert!(session.log.iter().all(|entry| entry.damage >= 1));
    assert_eq!(result.loser, session.attacker.character);
}

/// Aborting a live session blocks stepping, results, and rewards.
#[test]
fn test_abort_is_terminal_and_rewardless() {
    let engine = engine();
    let mut session = engine
        .initiate(&attacker(), &defender(), None, 1.0)
        .unwrap();
    engine.step_round(&mut session, &mut no_crit_rng()).unwrap();

    engine.abort(&mut session).unwrap();
    assert_eq!(session.state, SessionState::Aborted);
    assert!(engine.step_round(&mut session, &mut no_crit_rng()).is_err());
    assert!(engine.resolve_result(&session).is_err());
}

/// The advisory estimate stays inside its clamp for extreme stat blocks.
#[test]
fn test_estimated_duration_clamped() {
    let engine = engine();

    let mut glass = Character::new("glass", Faction::Sun);
    glass.set_trait(TraitType::Agility, 50);
    let mut wall = Character::new("wall", Faction::Ocean);
    wall.set_trait(TraitType::Strength, 50);

    for (a, b) in [
        (&glass, &wall),
        (&wall, &glass),
        (&glass, &glass),
        (&wall, &wall),
    ] {
        let session = engine.initiate(a, b, None, 1.0).unwrap();
        assert!(session.estimated_duration_secs >= 10.0);
        assert!(session.estimated_duration_secs <= 60.0);
    }
}

/// Influence scoring follows the short-fight, contested, and third-party
/// multipliers.
#[test]
fn test_territory_influence_branches() {
    let engine = engine();

    // Third faction holds the ground: x0.7, and the long route avoids the
    // short-fight bonus
    let mut territory = Territory::new("Eta Valley", Vec2::default());
    territory.controlled_by = Some(Faction::Red);

    let a = Character::new("a", Faction::Sun);
    let b = Character::new("b", Faction::Ocean);
    let mut session = engine.initiate(&a, &b, Some(&territory), 1.0).unwrap();
    let result = engine
        .run_to_completion(&mut session, &mut no_crit_rng())
        .unwrap();

    let influence = result.territory_influence.unwrap();
    let expected = (10.0 + result.rounds as f32 * 2.0) * 0.7;
    assert!(result.rounds >= 5);
    assert!((influence.amount - expected).abs() < 1e-3);

    // Contested quick fight: x1.5 and x1.3 stack
    let mut contested = Territory::new("Delta Region", Vec2::default());
    contested.add_contestant(Faction::Sun);
    let mut quick = engine
        .initiate(&attacker(), &defender(), Some(&contested), 3.0)
        .unwrap();
    let result = engine
        .run_to_completion(&mut quick, &mut no_crit_rng())
        .unwrap();
    assert!(result.rounds < 5);
    let influence = result.territory_influence.unwrap();
    let expected = (10.0 + result.rounds as f32 * 2.0) * 1.5 * 1.3;
    assert!((influence.amount - expected).abs() < 1e-3);
}

/// Distributing the same combat twice produces identical cumulative
/// deltas as distributing it once.
#[test]
fn test_reward_distribution_idempotent_end_to_end() {
    let engine = engine();
    let winner = attacker();
    let mut session = engine.initiate(&winner, &defender(), None, 1.0).unwrap();
    let result = engine
        .run_to_completion(&mut session, &mut no_crit_rng())
        .unwrap();

    let mut distributor = RewardDistributor::new();
    let first = distributor.distribute(&result, session.log.len(), &winner.traits, None);
    let second = distributor.distribute(&result, session.log.len(), &winner.traits, None);
    assert_eq!(first, second);

    // Applying the single bundle once is the whole effect
    let mut record = winner.clone();
    first.apply_winner(&mut record);
    let once = record.experience;
    assert_eq!(once, first.winner_experience);
    assert!(first.trait_gains.contains_key(&TraitType::Strength));
}
