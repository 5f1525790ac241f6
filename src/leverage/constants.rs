//! Leverage tuning constants - all weights, caps, and targets in one place
//!
//! The ratios between cap and weight drive the ceiling of the multiplier;
//! targets drive how fast progress fills. Exact values are tunable.

/// Floor of every multiplier
pub const BASE_RATE: f32 = 1.0;

// Territory control
pub const TERRITORY_COUNT_WEIGHT: f32 = 0.05;
pub const TERRITORY_COUNT_CAP: f32 = 0.30;
pub const TERRITORY_COUNT_TARGET: f32 = 10.0;
pub const TERRITORY_CLUSTER_WEIGHT: f32 = 0.03;
pub const TERRITORY_CLUSTER_CAP: f32 = 0.15;
pub const TERRITORY_CLUSTER_TARGET: f32 = 5.0;
/// World-unit radius within which controlled territories count as clustered
pub const CLUSTER_RADIUS: f32 = 200.0;

// Resource diversity
pub const RESOURCE_DIVERSITY_WEIGHT: f32 = 0.05;
pub const RESOURCE_DIVERSITY_CAP: f32 = 0.20;
pub const RESOURCE_DIVERSITY_TARGET: f32 = 4.0;
pub const STOCKPILE_WEIGHT: f32 = 0.0001;
pub const STOCKPILE_CAP: f32 = 0.10;
pub const STOCKPILE_TARGET: f32 = 1000.0;

// Mission completion
pub const MISSION_COMPLETED_WEIGHT: f32 = 0.025;
pub const MISSION_COMPLETED_CAP: f32 = 0.25;
pub const MISSION_COMPLETED_TARGET: f32 = 10.0;
pub const MISSION_ACTIVE_WEIGHT: f32 = 0.01;
pub const MISSION_ACTIVE_CAP: f32 = 0.05;
pub const MISSION_ACTIVE_TARGET: f32 = 5.0;

// Level progression
pub const LEVEL_WEIGHT: f32 = 0.05;
pub const LEVEL_CAP: f32 = 0.25;
pub const LEVEL_TARGET: f32 = 6.0;

// Achievements
pub const ACHIEVEMENT_WEIGHT: f32 = 0.02;
pub const ACHIEVEMENT_CAP: f32 = 0.20;
pub const ACHIEVEMENT_TARGET: f32 = 10.0;

// Social standing
pub const ALLIANCE_WEIGHT: f32 = 0.03;
pub const ALLIANCE_CAP: f32 = 0.15;
pub const ALLIANCE_TARGET: f32 = 5.0;

// Research
pub const RESEARCH_WEIGHT: f32 = 0.04;
pub const RESEARCH_CAP: f32 = 0.30;
pub const RESEARCH_TARGET: f32 = 8.0;

// Combat rating
pub const COMBAT_RATING_WEIGHT: f32 = 0.001;
pub const COMBAT_RATING_CAP: f32 = 0.20;
pub const COMBAT_RATING_TARGET: f32 = 200.0;

// Trait mastery
pub const TRAIT_MASTERY_WEIGHT: f32 = 0.01;
pub const TRAIT_MASTERY_CAP: f32 = 0.15;
pub const TRAIT_MASTERY_TARGET: f32 = 15.0;

// Synergy efficiency
pub const EFFICIENCY_PROGRESS_CAP: f32 = 0.5;
pub const EFFICIENCY_PROGRESS_DIVISOR: f32 = 200.0;
pub const EFFICIENCY_CATEGORY_STEP: f32 = 0.1;
pub const EFFICIENCY_CATEGORY_CAP: f32 = 0.3;

// Potential ranking
pub const POTENTIAL_ACTION_LIMIT: usize = 5;
/// Remaining-progress percentage above which an action is hard
pub const DIFFICULTY_HARD_THRESHOLD: f32 = 70.0;
/// Remaining-progress percentage above which an action is medium
pub const DIFFICULTY_MEDIUM_THRESHOLD: f32 = 30.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_are_reachable() {
        // Every cap must be reachable before the target is exhausted,
        // otherwise progress hits 100 while value is still short of max.
        assert!(TERRITORY_COUNT_WEIGHT * TERRITORY_COUNT_TARGET >= TERRITORY_COUNT_CAP);
        assert!(RESOURCE_DIVERSITY_WEIGHT * RESOURCE_DIVERSITY_TARGET >= RESOURCE_DIVERSITY_CAP);
        assert!(MISSION_COMPLETED_WEIGHT * MISSION_COMPLETED_TARGET >= MISSION_COMPLETED_CAP);
        assert!(LEVEL_WEIGHT * LEVEL_TARGET >= LEVEL_CAP);
        assert!(ACHIEVEMENT_WEIGHT * ACHIEVEMENT_TARGET >= ACHIEVEMENT_CAP);
        assert!(ALLIANCE_WEIGHT * ALLIANCE_TARGET >= ALLIANCE_CAP);
        assert!(RESEARCH_WEIGHT * RESEARCH_TARGET >= RESEARCH_CAP);
        assert!(COMBAT_RATING_WEIGHT * COMBAT_RATING_TARGET >= COMBAT_RATING_CAP);
        assert!(TRAIT_MASTERY_WEIGHT * TRAIT_MASTERY_TARGET >= TRAIT_MASTERY_CAP);
    }

    #[test]
    fn test_efficiency_bounds() {
        // 1.0 base + capped progress term + capped category term
        assert!(1.0 + EFFICIENCY_PROGRESS_CAP + EFFICIENCY_CATEGORY_CAP <= 1.8 + f32::EPSILON);
    }

    #[test]
    fn test_difficulty_thresholds_ordered() {
        assert!(DIFFICULTY_HARD_THRESHOLD > DIFFICULTY_MEDIUM_THRESHOLD);
    }
}
