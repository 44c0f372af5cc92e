/*!
 * Migration file generation for companion translation tables.
 *
 * Given a translatable entity (or a bare parent table name), derives the
 * companion table and foreign key with the same naming rules the
 * repository uses and writes a timestamped SQL migration file. Generation
 * refuses to run when a migration for that companion table already exists
 * in the target directory, so an existing migration is never overwritten.
 */

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::database::models::Translatable;
use crate::database::schema::{companion_table_ddl, l10n_table_name};
use crate::errors::MigrationError;

/// Timestamped migration filename, capturing the created table name
static MIGRATION_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}_\d{2}_\d{2}_\d{6}_create_(.+)_table\.sql$").expect("valid pattern")
});

/// Filename for a companion-table migration generated now
pub fn migration_file_name(l10n_table: &str) -> String {
    format!(
        "{}_create_{}_table.sql",
        Local::now().format("%Y_%m_%d_%H%M%S"),
        l10n_table
    )
}

/// Find an existing migration for the given companion table
///
/// Scans the directory for timestamped migration files creating the same
/// table, regardless of their timestamp.
pub fn find_existing_migration(
    dir: &Path,
    l10n_table: &str,
) -> Result<Option<PathBuf>, MigrationError> {
    if !dir.exists() {
        return Ok(None);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(captures) = MIGRATION_FILE.captures(name) {
            if &captures[1] == l10n_table {
                return Ok(Some(entry.path()));
            }
        }
    }

    Ok(None)
}

/// Generate the companion-table migration for an entity
///
/// Writes `<timestamp>_create_<table>_table.sql` into `dir` (created if
/// missing) and returns its path. Fails with
/// [`MigrationError::AlreadyExists`] when the directory already holds a
/// migration for that companion table.
pub fn generate_l10n_migration<E: Translatable>(
    dir: &Path,
    entity: &E,
    config: &Config,
    key_type: &str,
) -> Result<PathBuf, MigrationError> {
    let l10n_table = l10n_table_name(entity.table(), config);

    if let Some(existing) = find_existing_migration(dir, &l10n_table)? {
        return Err(MigrationError::AlreadyExists(existing));
    }

    std::fs::create_dir_all(dir)?;

    let path = dir.join(migration_file_name(&l10n_table));
    let ddl = companion_table_ddl(entity, config, key_type);
    let content = format!("-- Create the {} translations table\n{}\n", l10n_table, ddl);

    // Write through a temp file so a crash never leaves a half-written
    // migration behind.
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(&path).map_err(|e| MigrationError::Io(e.error))?;

    info!("Created migration {}", path.display());
    Ok(path)
}
