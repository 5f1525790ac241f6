//! Leverage aggregation
//!
//! Turns a game-state snapshot into one bounded multiplier. Each category
//! scores its raw metrics independently; the total then picks up a synergy
//! term that favors balanced progress over a single maxed category.

use crate::core::error::Result;
use crate::leverage::bonus::{BonusBreakdown, BonusCategory, LeverageBonus, LeverageMultiplier};
use crate::leverage::constants::*;
use crate::leverage::potential::rank_potential;
use crate::state::snapshot::GameStateSnapshot;
use crate::state::territory::Territory;

/// Computes leverage multipliers from snapshots
///
/// Stateless; construct one per engine and pass it where needed.
#[derive(Debug, Clone, Default)]
pub struct LeverageAggregator;

impl LeverageAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Score a snapshot into a full multiplier
    pub fn calculate(&self, snapshot: &GameStateSnapshot) -> Result<LeverageMultiplier> {
        snapshot.validate()?;

        let bonuses = collect_bonuses(snapshot);
        let (total, efficiency) = aggregate_total(&bonuses);
        let potential = rank_potential(&bonuses);

        tracing::debug!(
            total,
            efficiency,
            active = bonuses.active_categories(),
            "leverage recalculated"
        );

        Ok(LeverageMultiplier {
            total,
            base_rate: BASE_RATE,
            bonuses,
            efficiency,
            potential,
        })
    }
}

/// Non-finite metrics contribute nothing rather than poisoning the total
fn guard(raw: f32) -> f32 {
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Controlled territories with another controlled territory in range
fn clustered_count(controlled: &[&Territory]) -> usize {
    controlled
        .iter()
        .filter(|t| {
            controlled
                .iter()
                .any(|other| other.id != t.id && t.position.distance(&other.position) <= CLUSTER_RADIUS)
        })
        .count()
}

/// Score every category of a snapshot
pub fn collect_bonuses(snapshot: &GameStateSnapshot) -> BonusBreakdown {
    let mut breakdown = BonusBreakdown::default();
    let character = &snapshot.character;
    let faction = character.faction;

    // Territory control: count plus clustering
    let controlled: Vec<&Territory> = snapshot
        .territories
        .iter()
        .filter(|t| t.is_controlled_by(faction))
        .collect();
    push_bonus(
        &mut breakdown,
        BonusCategory::TerritoryControl,
        LeverageBonus::from_metric(
            controlled.len() as f32,
            TERRITORY_COUNT_WEIGHT,
            TERRITORY_COUNT_CAP,
            TERRITORY_COUNT_TARGET,
            "territory_count",
            format!("Controlling {} territories", controlled.len()),
        ),
    );
    let clustered = clustered_count(&controlled);
    push_bonus(
        &mut breakdown,
        BonusCategory::TerritoryControl,
        LeverageBonus::from_metric(
            clustered as f32,
            TERRITORY_CLUSTER_WEIGHT,
            TERRITORY_CLUSTER_CAP,
            TERRITORY_CLUSTER_TARGET,
            "territory_clustering",
            format!("{clustered} territories in mutual support range"),
        ),
    );

    // Resource diversity: unique types plus stockpile depth
    let unique = character.unique_resource_types();
    push_bonus(
        &mut breakdown,
        BonusCategory::ResourceDiversity,
        LeverageBonus::from_metric(
            unique as f32,
            RESOURCE_DIVERSITY_WEIGHT,
            RESOURCE_DIVERSITY_CAP,
            RESOURCE_DIVERSITY_TARGET,
            "resource_diversity",
            format!("Diversified {unique} resource types"),
        ),
    );
    let stockpile = character.total_resources();
    push_bonus(
        &mut breakdown,
        BonusCategory::ResourceDiversity,
        LeverageBonus::from_metric(
            stockpile as f32,
            STOCKPILE_WEIGHT,
            STOCKPILE_CAP,
            STOCKPILE_TARGET,
            "stockpile_depth",
            format!("{stockpile} resource units held"),
        ),
    );

    // Missions: completed plus active
    let completed = snapshot.missions.iter().filter(|m| m.is_completed()).count();
    let active = snapshot.missions.iter().filter(|m| m.is_active()).count();
    push_bonus(
        &mut breakdown,
        BonusCategory::MissionCompletion,
        LeverageBonus::from_metric(
            completed as f32,
            MISSION_COMPLETED_WEIGHT,
            MISSION_COMPLETED_CAP,
            MISSION_COMPLETED_TARGET,
            "missions_completed",
            format!("{completed} missions completed"),
        ),
    );
    push_bonus(
        &mut breakdown,
        BonusCategory::MissionCompletion,
        LeverageBonus::from_metric(
            active as f32,
            MISSION_ACTIVE_WEIGHT,
            MISSION_ACTIVE_CAP,
            MISSION_ACTIVE_TARGET,
            "missions_active",
            format!("{active} missions in progress"),
        ),
    );

    // Level progression
    push_bonus(
        &mut breakdown,
        BonusCategory::LevelProgression,
        LeverageBonus::from_metric(
            character.level.saturating_sub(1) as f32,
            LEVEL_WEIGHT,
            LEVEL_CAP,
            LEVEL_TARGET,
            "character_level",
            format!("Level {} progression", character.level),
        ),
    );

    // Achievements
    let achievements = snapshot.achievements.len();
    push_bonus(
        &mut breakdown,
        BonusCategory::Achievements,
        LeverageBonus::from_metric(
            achievements as f32,
            ACHIEVEMENT_WEIGHT,
            ACHIEVEMENT_CAP,
            ACHIEVEMENT_TARGET,
            "achievement_count",
            format!("{achievements} achievements unlocked"),
        ),
    );

    // Social standing
    push_bonus(
        &mut breakdown,
        BonusCategory::SocialStanding,
        LeverageBonus::from_metric(
            snapshot.social.alliance_size as f32,
            ALLIANCE_WEIGHT,
            ALLIANCE_CAP,
            ALLIANCE_TARGET,
            "alliance_size",
            format!("Allied with {} players", snapshot.social.alliance_size),
        ),
    );

    // Research
    let research = snapshot.research.completed.len();
    push_bonus(
        &mut breakdown,
        BonusCategory::Research,
        LeverageBonus::from_metric(
            research as f32,
            RESEARCH_WEIGHT,
            RESEARCH_CAP,
            RESEARCH_TARGET,
            "research_completed",
            format!("{research} technologies researched"),
        ),
    );

    // Combat rating
    push_bonus(
        &mut breakdown,
        BonusCategory::CombatRating,
        LeverageBonus::from_metric(
            guard(snapshot.combat_history.rating),
            COMBAT_RATING_WEIGHT,
            COMBAT_RATING_CAP,
            COMBAT_RATING_TARGET,
            "combat_rating",
            format!(
                "Combat rating {:.0} ({}-{})",
                guard(snapshot.combat_history.rating),
                snapshot.combat_history.wins,
                snapshot.combat_history.losses
            ),
        ),
    );

    // Trait mastery
    let trait_levels: u32 = character.traits.iter().map(|t| t.level).sum();
    push_bonus(
        &mut breakdown,
        BonusCategory::TraitMastery,
        LeverageBonus::from_metric(
            trait_levels as f32,
            TRAIT_MASTERY_WEIGHT,
            TRAIT_MASTERY_CAP,
            TRAIT_MASTERY_TARGET,
            "trait_mastery",
            format!("{trait_levels} combined trait levels"),
        ),
    );

    breakdown
}

fn push_bonus(breakdown: &mut BonusBreakdown, category: BonusCategory, bonus: Option<LeverageBonus>) {
    if let Some(bonus) = bonus {
        breakdown.category_mut(category).push(bonus);
    }
}

/// Fold a breakdown into (total, efficiency)
///
/// total = (base_rate + sum of value*progress) * efficiency, where the
/// synergy efficiency rewards balanced progress across many categories.
/// Monotonic non-decreasing in every bonus's value and progress.
pub fn aggregate_total(breakdown: &BonusBreakdown) -> (f32, f32) {
    let mut raw_sum = 0.0;
    let mut progress_sum = 0.0;
    let mut count = 0usize;

    for bonus in breakdown.all() {
        raw_sum += guard(bonus.value) * (guard(bonus.progress) / 100.0);
        progress_sum += guard(bonus.progress);
        count += 1;
    }

    let mean_progress = if count > 0 {
        progress_sum / count as f32
    } else {
        0.0
    };

    let efficiency = 1.0
        + (mean_progress / EFFICIENCY_PROGRESS_DIVISOR).min(EFFICIENCY_PROGRESS_CAP)
        + (breakdown.active_categories() as f32 * EFFICIENCY_CATEGORY_STEP)
            .min(EFFICIENCY_CATEGORY_CAP);

    let total = (BASE_RATE + raw_sum) * efficiency;
    (total, efficiency)
}
