//! Error types for loading and resolving loot configuration.
//!
//! Roll operations never fail on content problems; these errors only
//! arise at the configuration boundary.

use std::path::PathBuf;

/// Errors that can occur while loading or resolving loot configuration.
#[derive(Debug, thiserror::Error)]
pub enum LootError {
    /// A pool or set references an item id the catalog does not know.
    #[error("unknown item '{item}' referenced by {context}")]
    UnknownItem {
        /// The missing item id.
        item: String,
        /// Where the reference was found (pool or set name).
        context: String,
    },

    /// A loot table was requested by name but is not configured.
    #[error("unknown loot table: {0}")]
    UnknownTable(String),

    /// A set-piece config was requested by id but is not configured.
    #[error("unknown set: {0}")]
    UnknownSet(String),

    /// The configuration is structurally invalid.
    #[error("invalid loot config: {0}")]
    InvalidConfig(String),

    /// A config file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The file path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A config document is not valid JSON for the expected shape.
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for loot configuration operations.
pub type LootResult<T> = Result<T, LootError>;
