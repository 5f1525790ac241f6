//! Leverage bonuses and their closed category set
//!
//! The source signals are finite and known at design time, so categories
//! are a fixed enum-indexed structure rather than an open string-keyed map.

use serde::{Deserialize, Serialize};

use crate::leverage::potential::PotentialReport;

/// The nine progress signals that feed the multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusCategory {
    TerritoryControl,
    ResourceDiversity,
    MissionCompletion,
    LevelProgression,
    Achievements,
    SocialStanding,
    Research,
    CombatRating,
    TraitMastery,
}

impl BonusCategory {
    pub const ALL: [BonusCategory; 9] = [
        BonusCategory::TerritoryControl,
        BonusCategory::ResourceDiversity,
        BonusCategory::MissionCompletion,
        BonusCategory::LevelProgression,
        BonusCategory::Achievements,
        BonusCategory::SocialStanding,
        BonusCategory::Research,
        BonusCategory::CombatRating,
        BonusCategory::TraitMastery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BonusCategory::TerritoryControl => "territory_control",
            BonusCategory::ResourceDiversity => "resource_diversity",
            BonusCategory::MissionCompletion => "mission_completion",
            BonusCategory::LevelProgression => "level_progression",
            BonusCategory::Achievements => "achievements",
            BonusCategory::SocialStanding => "social_standing",
            BonusCategory::Research => "research",
            BonusCategory::CombatRating => "combat_rating",
            BonusCategory::TraitMastery => "trait_mastery",
        }
    }
}

/// One scored progress signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageBonus {
    /// Current contribution, never above `max`
    pub value: f32,
    pub description: String,
    /// Short machine-friendly name of the underlying metric
    pub source: String,
    /// Cap on the contribution
    pub max: f32,
    /// How far along the metric is toward its target, 0-100
    pub progress: f32,
}

impl LeverageBonus {
    /// Score a raw metric against weight/cap/target
    ///
    /// Returns `None` for zero, negative, or non-finite metrics - absent
    /// signals produce no bonus rather than a zero-valued one. A zero
    /// target counts as already complete.
    pub fn from_metric(
        raw: f32,
        weight: f32,
        cap: f32,
        target: f32,
        source: &str,
        description: String,
    ) -> Option<Self> {
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }

        let value = (raw * weight).min(cap);
        let progress = if target <= 0.0 {
            100.0
        } else {
            (raw / target * 100.0).min(100.0)
        };

        Some(Self {
            value,
            description,
            source: source.into(),
            max: cap,
            progress,
        })
    }

    /// Progress still missing toward the target, 0-100
    pub fn remaining_progress(&self) -> f32 {
        (100.0 - self.progress).max(0.0)
    }
}

/// Enum-indexed bonus lists, one per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusBreakdown {
    pub territory_control: Vec<LeverageBonus>,
    pub resource_diversity: Vec<LeverageBonus>,
    pub mission_completion: Vec<LeverageBonus>,
    pub level_progression: Vec<LeverageBonus>,
    pub achievements: Vec<LeverageBonus>,
    pub social_standing: Vec<LeverageBonus>,
    pub research: Vec<LeverageBonus>,
    pub combat_rating: Vec<LeverageBonus>,
    pub trait_mastery: Vec<LeverageBonus>,
}

impl BonusBreakdown {
    pub fn category(&self, category: BonusCategory) -> &[LeverageBonus] {
        match category {
            BonusCategory::TerritoryControl => &self.territory_control,
            BonusCategory::ResourceDiversity => &self.resource_diversity,
            BonusCategory::MissionCompletion => &self.mission_completion,
            BonusCategory::LevelProgression => &self.level_progression,
            BonusCategory::Achievements => &self.achievements,
            BonusCategory::SocialStanding => &self.social_standing,
            BonusCategory::Research => &self.research,
            BonusCategory::CombatRating => &self.combat_rating,
            BonusCategory::TraitMastery => &self.trait_mastery,
        }
    }

    pub fn category_mut(&mut self, category: BonusCategory) -> &mut Vec<LeverageBonus> {
        match category {
            BonusCategory::TerritoryControl => &mut self.territory_control,
            BonusCategory::ResourceDiversity => &mut self.resource_diversity,
            BonusCategory::MissionCompletion => &mut self.mission_completion,
            BonusCategory::LevelProgression => &mut self.level_progression,
            BonusCategory::Achievements => &mut self.achievements,
            BonusCategory::SocialStanding => &mut self.social_standing,
            BonusCategory::Research => &mut self.research,
            BonusCategory::CombatRating => &mut self.combat_rating,
            BonusCategory::TraitMastery => &mut self.trait_mastery,
        }
    }

    /// Iterate (category, bonuses) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (BonusCategory, &[LeverageBonus])> + '_ {
        BonusCategory::ALL.iter().map(move |c| (*c, self.category(*c)))
    }

    /// Every bonus across all categories
    pub fn all(&self) -> impl Iterator<Item = &LeverageBonus> + '_ {
        BonusCategory::ALL.iter().flat_map(move |c| self.category(*c).iter())
    }

    /// Total number of bonuses
    pub fn len(&self) -> usize {
        self.all().count()
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }

    /// Categories with at least one bonus
    pub fn active_categories(&self) -> usize {
        BonusCategory::ALL
            .iter()
            .filter(|c| !self.category(**c).is_empty())
            .count()
    }
}

/// The aggregated multiplier handed to combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageMultiplier {
    /// Final scalar applied to outgoing damage
    pub total: f32,
    /// Constant floor every player starts from
    pub base_rate: f32,
    pub bonuses: BonusBreakdown,
    /// Synergy scalar, at least 1.0
    pub efficiency: f32,
    /// Ranked improvement actions
    pub potential: PotentialReport,
}
