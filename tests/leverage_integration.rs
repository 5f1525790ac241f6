//! Leverage aggregation integration tests
//!
//! Scenario checks of the category scoring, the synergy efficiency, the
//! 1.0 floor, and the potential-action ranking.

use hexhive::core::types::{Faction, ResourceType, Vec2};
use hexhive::leverage::aggregator::{aggregate_total, collect_bonuses, LeverageAggregator};
use hexhive::leverage::bonus::BonusCategory;
use hexhive::leverage::potential::Difficulty;
use hexhive::state::character::{Character, TraitType};
use hexhive::state::snapshot::{GameStateSnapshot, MissionRecord};
use hexhive::state::territory::Territory;

fn controlled(name: &str, faction: Faction, position: Vec2) -> Territory {
    let mut territory = Territory::new(name, position);
    territory.controlled_by = Some(faction);
    territory
}

/// Three controlled territories with no clustering: value 0.15 at 30%.
#[test]
fn test_three_territories_scenario() {
    let character = Character::new("Vex", Faction::Sun);
    let mut snapshot = GameStateSnapshot::for_character(character);
    snapshot.territories = vec![
        controlled("Alpha Sector", Faction::Sun, Vec2::new(0.0, 0.0)),
        controlled("Beta Quadrant", Faction::Sun, Vec2::new(900.0, 0.0)),
        controlled("Gamma Zone", Faction::Sun, Vec2::new(0.0, 900.0)),
    ];

    let multiplier = LeverageAggregator::new().calculate(&snapshot).unwrap();
    let territory = multiplier.bonuses.category(BonusCategory::TerritoryControl);

    assert_eq!(territory.len(), 1, "spread territories earn no clustering");
    assert!((territory[0].value - 0.15).abs() < 1e-6);
    assert!((territory[0].progress - 30.0).abs() < 1e-4);
}

/// An empty snapshot is not an error; it scores the bare floor.
#[test]
fn test_empty_snapshot_scores_floor() {
    let snapshot = GameStateSnapshot::for_character(Character::new("Nil", Faction::Green));
    let multiplier = LeverageAggregator::new().calculate(&snapshot).unwrap();

    assert!(multiplier.bonuses.is_empty());
    assert!((multiplier.total - multiplier.base_rate).abs() < 1e-6);
    assert!(multiplier.potential.actions.is_empty());
}

/// The total never drops below the base rate, whatever the snapshot.
#[test]
fn test_total_never_below_base_rate() {
    let mut character = Character::new("Vex", Faction::Sun);
    character.set_trait(TraitType::Strength, 1);
    let mut snapshot = GameStateSnapshot::for_character(character);
    snapshot.missions = vec![MissionRecord { id: "m".into(), progress: 1.0 }];

    let multiplier = LeverageAggregator::new().calculate(&snapshot).unwrap();
    assert!(multiplier.total >= multiplier.base_rate);
}

/// At equal progress, spreading across more categories earns a higher
/// synergy efficiency than concentrating in one.
#[test]
fn test_efficiency_rewards_breadth() {
    // One maxed category: level progression at full progress
    let mut narrow_character = Character::new("Narrow", Faction::Sun);
    narrow_character.add_experience(10_000);
    let narrow = GameStateSnapshot::for_character(narrow_character);

    // Same maxed level plus three more categories at full progress
    let mut broad_character = Character::new("Broad", Faction::Sun);
    broad_character.add_experience(10_000);
    let mut broad = GameStateSnapshot::for_character(broad_character);
    broad.achievements = (0..10).map(|i| format!("a{i}")).collect();
    broad.social.alliance_size = 5;
    broad.research.completed = (0..8).map(|i| format!("r{i}")).collect();

    let aggregator = LeverageAggregator::new();
    let narrow_result = aggregator.calculate(&narrow).unwrap();
    let broad_result = aggregator.calculate(&broad).unwrap();

    assert!(broad_result.efficiency > narrow_result.efficiency);
    assert!(broad_result.total > narrow_result.total);
    assert!(broad_result.bonuses.active_categories() > narrow_result.bonuses.active_categories());
}

/// Potential actions rank by impact, cap at five, and tier by remaining
/// progress.
#[test]
fn test_potential_ranking() {
    let mut character = Character::new("Vex", Faction::Sun);
    character.add_experience(1000);
    character.set_trait(TraitType::Strength, 1);
    character.add_resource(ResourceType::Energy, 10);
    let mut snapshot = GameStateSnapshot::for_character(character);
    snapshot.territories = vec![controlled("Alpha Sector", Faction::Sun, Vec2::default())];
    snapshot.missions = vec![MissionRecord { id: "m".into(), progress: 40.0 }];
    snapshot.achievements = vec!["a".into()];
    snapshot.social.alliance_size = 1;
    snapshot.research.completed = vec!["r".into()];
    snapshot.combat_history.rating = 10.0;

    let multiplier = LeverageAggregator::new().calculate(&snapshot).unwrap();
    let actions = &multiplier.potential.actions;

    assert_eq!(actions.len(), 5);
    for window in actions.windows(2) {
        assert!(window[0].impact >= window[1].impact);
    }
    for action in actions {
        let expected = Difficulty::from_remaining(action.remaining_progress);
        assert_eq!(action.difficulty, expected);
    }
    // The summed headroom covers candidates beyond the top five
    let top_sum: f32 = actions.iter().map(|a| a.impact).sum();
    assert!(multiplier.potential.total_potential >= top_sum);
}

/// A malformed snapshot is rejected before scoring.
#[test]
fn test_malformed_snapshot_rejected() {
    let mut snapshot = GameStateSnapshot::for_character(Character::new("Vex", Faction::Sun));
    snapshot.missions = vec![MissionRecord { id: "m".into(), progress: 140.0 }];
    assert!(LeverageAggregator::new().calculate(&snapshot).is_err());
}

/// Raising a single metric never lowers the total.
#[test]
fn test_metric_growth_is_monotonic() {
    let aggregator = LeverageAggregator::new();
    let mut previous = 0.0;

    for achievements in 0..15 {
        let mut snapshot = GameStateSnapshot::for_character(Character::new("Vex", Faction::Sun));
        snapshot.achievements = (0..achievements).map(|i| format!("a{i}")).collect();

        let total = aggregator.calculate(&snapshot).unwrap().total;
        assert!(
            total >= previous - 1e-6,
            "total regressed at {achievements} achievements"
        );
        previous = total;
    }
}

/// aggregate_total is pure over the collected breakdown.
#[test]
fn test_collect_then_aggregate_matches_calculate() {
    let mut character = Character::new("Vex", Faction::Sun);
    character.set_trait(TraitType::Agility, 2);
    let mut snapshot = GameStateSnapshot::for_character(character);
    snapshot.achievements = vec!["a".into()];

    let breakdown = collect_bonuses(&snapshot);
    let (total, efficiency) = aggregate_total(&breakdown);
    let multiplier = LeverageAggregator::new().calculate(&snapshot).unwrap();

    assert!((total - multiplier.total).abs() < 1e-6);
    assert!((efficiency - multiplier.efficiency).abs() < 1e-6);
}
