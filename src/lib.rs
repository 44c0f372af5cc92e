/*!
 * # lingostore - locale-aware persistence for SQLite records
 *
 * A Rust library for storing and reading per-locale attribute values of
 * database records, keeping a single source-of-truth record identity.
 *
 * ## Features
 *
 * - Embedded strategy: all locales' values of an attribute live in one
 *   column as a JSON locale mapping
 * - Companion-table strategy: one row per (record, locale) in a sibling
 *   `_l10n` table, merged into reads via a locale-scoped left join
 * - Upsert-based translation writes and per-locale deletion
 * - Staged translations flushed after the parent row is first persisted
 * - Migration-file generation for companion tables
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `locale`: Active-locale context shared across repositories
 * - `codec`: Embedded locale-mapping codec
 * - `embedded`: Record wrapper for the embedded strategy
 * - `database`: SQLite-backed persistence:
 *   - `database::connection`: Connection management
 *   - `database::schema`: Naming rules, DDL and introspection
 *   - `database::repository`: Companion-table reads and writes
 *   - `database::coordinator`: Parent writes with translation fan-out
 * - `migration`: Companion-table migration file generation
 * - `locale_utils`: ISO locale code utilities
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod codec;
pub mod database;
pub mod embedded;
pub mod errors;
pub mod locale;
pub mod locale_utils;
pub mod migration;

// Re-export main types for easier usage
pub use app_config::Config;
pub use codec::{LocaleMap, LocalizedValue};
pub use database::{
    CompanionRepository, DatabaseConnection, EntityDef, EntityDraft, LocalizedRow,
    PendingTranslations, SqlValue, Translatable, TranslationRecord, WriteCoordinator,
};
pub use embedded::EmbeddedRecord;
pub use errors::{CodecError, L10nError, MigrationError, RepositoryError};
pub use locale::LocaleContext;
