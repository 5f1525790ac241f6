pub mod modifiers;
pub mod resolution;
pub mod rewards;
pub mod session;
pub mod stats;

pub use modifiers::{resolve_modifiers, CombatModifiers};
pub use resolution::{CombatEngine, CombatResult, RoundOutcome, TerritoryInfluence};
pub use rewards::{RewardBundle, RewardDistributor};
pub use session::{CombatLogEntry, CombatSession, DamageKind, SessionState};
pub use stats::{calculate_stats, CombatStats};
