use thiserror::Error;

/// Failures surfaced by the engine and its collaborators.
///
/// Sparse data (missing form, xGI or history) is never an error; those
/// inputs are defaulted by the player model.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl EngineError {
    pub fn player_not_found(id: u32) -> Self {
        Self::NotFound {
            entity: "player",
            id,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
