/*!
 * Error types for the lingostore library.
 *
 * This module contains custom error types for the different parts of the
 * library, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when decoding or encoding embedded locale mappings
#[derive(Error, Debug)]
pub enum CodecError {
    /// The stored column value is non-empty but is not a valid locale mapping
    #[error("stored value is not a valid locale mapping: {detail}")]
    MalformedData {
        /// Parser diagnostic for the unreadable value
        detail: String,
    },

    /// The merged mapping could not be re-serialized
    #[error("failed to serialize locale mapping: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors that can occur in companion-table operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A companion-table upsert failed while flushing staged translations.
    /// Locales flushed before the failure are not rolled back.
    #[error("failed to write translation for locale '{locale}': {source}")]
    TranslationWrite {
        /// Locale whose upsert failed
        locale: String,
        /// Underlying storage error
        #[source]
        source: rusqlite::Error,
    },

    /// Any other storage-engine error, propagated unchanged
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Errors that can occur while generating migration files
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A migration for the same companion table already exists
    #[error("migration already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Filesystem error while scanning or writing the migrations directory
    #[error("migration file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main library error type that wraps all other errors
#[derive(Error, Debug)]
pub enum L10nError {
    /// Error from the embedded codec
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error from companion-table operations
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Error from migration generation
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for L10nError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<rusqlite::Error> for L10nError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Repository(RepositoryError::Storage(error))
    }
}
