//! Improvement-action ranking
//!
//! Every bonus short of full progress is a candidate action. Impact is the
//! headroom left in the bonus weighted by how much progress is missing.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::leverage::bonus::{BonusBreakdown, BonusCategory};
use crate::leverage::constants::{
    DIFFICULTY_HARD_THRESHOLD, DIFFICULTY_MEDIUM_THRESHOLD, POTENTIAL_ACTION_LIMIT,
};

/// Effort tier for an improvement action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Tier from the remaining-progress percentage
    pub fn from_remaining(remaining: f32) -> Self {
        if remaining > DIFFICULTY_HARD_THRESHOLD {
            Difficulty::Hard
        } else if remaining > DIFFICULTY_MEDIUM_THRESHOLD {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }
}

/// One ranked suggestion for raising the multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialAction {
    pub category: BonusCategory,
    pub source: String,
    pub description: String,
    /// Headroom gained by finishing this bonus
    pub impact: f32,
    pub remaining_progress: f32,
    pub difficulty: Difficulty,
}

/// Top actions plus the summed headroom across all candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PotentialReport {
    /// At most five, highest impact first
    pub actions: Vec<PotentialAction>,
    /// Summed impact over every unfinished bonus, not just the top five
    pub total_potential: f32,
}

/// Rank unfinished bonuses by impact
pub fn rank_potential(breakdown: &BonusBreakdown) -> PotentialReport {
    let mut actions: Vec<PotentialAction> = Vec::new();
    let mut total_potential = 0.0;

    for (category, bonuses) in breakdown.iter() {
        for bonus in bonuses {
            if bonus.progress >= 100.0 {
                continue;
            }

            let remaining = bonus.remaining_progress();
            let impact = (bonus.max - bonus.value) * (remaining / 100.0);
            if !impact.is_finite() || impact <= 0.0 {
                continue;
            }

            total_potential += impact;
            actions.push(PotentialAction {
                category,
                source: bonus.source.clone(),
                description: bonus.description.clone(),
                impact,
                remaining_progress: remaining,
                difficulty: Difficulty::from_remaining(remaining),
            });
        }
    }

    actions.sort_by_key(|a| std::cmp::Reverse(OrderedFloat(a.impact)));
    actions.truncate(POTENTIAL_ACTION_LIMIT);

    PotentialReport {
        actions,
        total_potential,
    }
}
