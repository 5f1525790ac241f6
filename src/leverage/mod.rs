pub mod aggregator;
pub mod bonus;
pub mod constants;
pub mod potential;

pub use aggregator::{aggregate_total, collect_bonuses, LeverageAggregator};
pub use bonus::{BonusBreakdown, BonusCategory, LeverageBonus, LeverageMultiplier};
pub use potential::{Difficulty, PotentialAction, PotentialReport};
