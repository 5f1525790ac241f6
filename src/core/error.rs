use thiserror::Error;

use crate::core::types::{CharacterId, CombatId, TerritoryId};

#[derive(Error, Debug)]
pub enum HiveError {
    #[error("Character not found: {0:?}")]
    CharacterNotFound(CharacterId),

    #[error("Territory not found: {0:?}")]
    TerritoryNotFound(TerritoryId),

    #[error("Combat session not found: {0:?}")]
    SessionNotFound(CombatId),

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Write conflict on {record} after {attempts} attempts")]
    ConcurrencyConflict { record: String, attempts: u32 },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl HiveError {
    /// Conflicts are safe to retry after re-reading the record
    pub fn is_retryable(&self) -> bool {
        matches!(self, HiveError::ConcurrencyConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, HiveError>;
