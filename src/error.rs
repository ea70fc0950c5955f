use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProspectError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Saved-item limit reached ({limit} on the free plan)")]
    QuotaExceeded { limit: usize },

    #[error("Daily inspection limit reached ({limit}/day on the free plan)")]
    DailyLimitReached { limit: u32 },

    #[error("Compare selection too large: {selected} items (max {max})")]
    CompareLimitExceeded { selected: usize, max: usize },

    #[error("Nothing selected")]
    EmptySelection,

    #[error("Pro feature: {0}")]
    ProRequired(&'static str),

    #[error("Saved item not found: {0}")]
    ItemNotFound(String),

    #[error("Could not read product data: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProspectError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ProspectError::QuotaExceeded { .. } => Some(
                "Remove items with `prospect remove <key>`, or enable pro:\n  prospect plan set --pro true"
            ),
            ProspectError::DailyLimitReached { .. } => Some(
                "The counter resets at midnight UTC, or enable pro:\n  prospect plan set --pro true"
            ),
            ProspectError::CompareLimitExceeded { .. } => Some(
                "Pick fewer items; `prospect list` shows the saved keys"
            ),
            ProspectError::EmptySelection => Some(
                "Pass at least one saved-item key: prospect compare <key> [<key>...]"
            ),
            ProspectError::ProRequired(_) => Some(
                "Enable pro with `prospect plan set --pro true` (or dev mode: --dev-mode true)"
            ),
            ProspectError::ItemNotFound(_) => Some(
                "Run `prospect list` to see saved items and their keys"
            ),
            ProspectError::ExtractionError(_) => Some(
                "Save the product page as complete HTML and pass the file path, e.g.\n  prospect inspect page.html --url https://..."
            ),
            ProspectError::DatabaseError(_) | ProspectError::StoreUnavailable(_) => Some(
                "Check that the data directory is writable, or point PROSPECT_DB at a fresh file"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProspectError>;
