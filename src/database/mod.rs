/*!
 * Database module for locale-aware persistence.
 *
 * This module provides SQLite-based persistence for translatable records:
 * - Locale-scoped reads joining the companion translations table
 * - Upsert-based translation writes keyed by (parent, locale)
 * - Write coordination flushing staged translations after the parent row
 */

// Allow dead code and unused imports - database types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod schema;
pub mod connection;
pub mod coordinator;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use coordinator::WriteCoordinator;
pub use models::{
    EntityDef, EntityDraft, LocalizedRow, PendingTranslations, SqlValue, Translatable,
    TranslationRecord,
};
pub use repository::CompanionRepository;
