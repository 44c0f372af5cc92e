/*!
 * Companion-table naming rules, schema generation and introspection.
 *
 * The companion table of a parent table is derived purely by convention:
 * `posts` stores its translations in `posts_l10n`, keyed by a singularized
 * foreign key (`post_id`) plus the locale column. The migration tooling and
 * the repository share these rules so generated schemas always line up with
 * the queries issued against them.
 */

use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;

use crate::app_config::Config;

use super::models::Translatable;

/// Derive the companion translations table name for a parent table
pub fn l10n_table_name(table: &str, config: &Config) -> String {
    format!("{}{}", table, config.table_postfix)
}

/// Derive the foreign key column name pointing at the parent row
///
/// Convention: singular form of the parent table joined with its primary
/// key name, e.g. `posts` + `id` -> `post_id`.
pub fn l10n_foreign_key(table: &str, primary_key: &str) -> String {
    format!("{}_{}", singularize(table), primary_key)
}

/// Singularize an English table name
///
/// Covers the plural forms conventional table names use; anything already
/// singular passes through unchanged.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["ches", "shes", "xes", "zes", "sses"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Build the CREATE TABLE statement for an entity's companion table
///
/// Layout: foreign key typed like the parent primary key, the locale
/// column, one TEXT column per translatable attribute, timestamps, and a
/// composite primary key on (foreign key, locale). The foreign key
/// cascades on parent deletion.
pub fn companion_table_ddl<E: Translatable>(entity: &E, config: &Config, key_type: &str) -> String {
    let table = l10n_table_name(entity.table(), config);
    let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());

    let mut ddl = format!("CREATE TABLE IF NOT EXISTS {} (\n", table);
    ddl.push_str(&format!(
        "    {} {} NOT NULL REFERENCES {}({}) ON DELETE CASCADE,\n",
        foreign_key,
        key_type,
        entity.table(),
        entity.primary_key()
    ));
    ddl.push_str(&format!("    {} TEXT NOT NULL,\n", config.locale_key));
    for attribute in entity.translatable_attributes() {
        ddl.push_str(&format!("    {} TEXT,\n", attribute));
    }
    ddl.push_str("    created_at TEXT NOT NULL,\n");
    ddl.push_str("    updated_at TEXT NOT NULL,\n");
    ddl.push_str(&format!(
        "    PRIMARY KEY ({}, {})\n);",
        foreign_key, config.locale_key
    ));

    ddl
}

/// Create the companion table for an entity if it does not exist
///
/// The foreign key column type is read from the parent table's primary
/// key so composite identities keep matching types.
pub fn create_companion_table<E: Translatable>(
    conn: &Connection,
    entity: &E,
    config: &Config,
) -> Result<()> {
    let key_type = parent_key_type(conn, entity.table(), entity.primary_key())?;
    let ddl = companion_table_ddl(entity, config, &key_type);

    conn.execute_batch(&ddl)
        .with_context(|| format!("Failed to create companion table for '{}'", entity.table()))?;

    info!(
        "Companion table {} ready",
        l10n_table_name(entity.table(), config)
    );
    Ok(())
}

/// Check whether a table exists in the database
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .context("Failed to check table existence")?;

    Ok(count > 0)
}

/// List the column names of a table, in declaration order
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|r| r.ok())
        .collect();

    Ok(columns)
}

/// Declared type of the parent table's primary key column
///
/// Falls back to INTEGER when the parent table is absent or the column
/// has no declared type.
fn parent_key_type(conn: &Connection, table: &str, primary_key: &str) -> Result<String> {
    if !table_exists(conn, table)? {
        return Ok("INTEGER".to_string());
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let declared = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?
        .filter_map(|r| r.ok())
        .find(|(name, _)| name == primary_key)
        .map(|(_, decl_type)| decl_type);

    Ok(match declared {
        Some(decl_type) if !decl_type.is_empty() => decl_type,
        _ => "INTEGER".to_string(),
    })
}
