/*!
 * Write coordination for translatable entities.
 *
 * Persists parent drafts and fans staged translations out to the
 * companion table once the parent row is durable. A draft carrying a
 * pending-translations buffer moves through Staged while it waits for the
 * parent write, Flushing while its locale entries are upserted in staging
 * order, and back to Idle when the buffer is cleared. Deleting a parent
 * always cascades to its companion rows, staged or not.
 *
 * The flush is sequential upserts with no enclosing transaction: if one
 * locale's upsert fails, the error surfaces immediately, the remaining
 * locales are not attempted and previously flushed locales stay written.
 * Callers that need the whole flush to be atomic run it inside
 * [`super::connection::DatabaseConnection::transaction`].
 */

use anyhow::Result;
use log::debug;
use rusqlite::params_from_iter;

use super::models::{EntityDraft, SqlValue, Translatable};
use super::repository::CompanionRepository;
use super::schema::l10n_table_name;

/// Coordinates parent writes with translation fan-out
#[derive(Clone)]
pub struct WriteCoordinator {
    /// Companion-table repository used for the fan-out
    repo: CompanionRepository,
}

impl WriteCoordinator {
    /// Create a coordinator over the given repository
    pub fn new(repo: CompanionRepository) -> Self {
        Self { repo }
    }

    /// The underlying repository
    pub fn repository(&self) -> &CompanionRepository {
        &self.repo
    }

    /// Insert the parent row, then flush the draft's staged translations
    ///
    /// Translation rows need the parent's primary key, so the flush runs
    /// strictly after the insert. When the draft does not carry a primary
    /// key value, the assigned rowid is used. Returns the parent's key.
    pub fn create<E: Translatable>(&self, entity: &E, draft: &mut EntityDraft) -> Result<SqlValue> {
        let columns = draft.columns();

        let id = self.repo.connection().execute(|conn| {
            let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

            let sql = if columns.is_empty() {
                format!("INSERT INTO {} DEFAULT VALUES", entity.table())
            } else {
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    entity.table(),
                    names.join(", "),
                    placeholders.join(", ")
                )
            };

            conn.execute(&sql, params_from_iter(columns.iter().map(|(_, value)| value)))?;

            let id = columns
                .iter()
                .find(|(name, _)| name == entity.primary_key())
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| SqlValue::Integer(conn.last_insert_rowid()));
            Ok(id)
        })?;

        debug!("Created {} row {}", entity.table(), id);

        self.flush_pending(entity, &id, draft)?;
        Ok(id)
    }

    /// Update the parent row, then flush the draft's staged translations
    ///
    /// A draft with no column changes skips the parent update and only
    /// flushes; that is how translations are staged onto an entity that
    /// is already persisted.
    pub fn update<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
        draft: &mut EntityDraft,
    ) -> Result<()> {
        let id = id.into();
        let columns = draft.columns();

        if !columns.is_empty() {
            self.repo.connection().execute(|conn| {
                let assignments: Vec<String> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, (name, _))| format!("{} = ?{}", name, i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE {} = ?{}",
                    entity.table(),
                    assignments.join(", "),
                    entity.primary_key(),
                    columns.len() + 1
                );

                let mut params: Vec<SqlValue> =
                    columns.iter().map(|(_, value)| value.clone()).collect();
                params.push(id.clone());

                conn.execute(&sql, params_from_iter(params.iter()))?;
                Ok(())
            })?;
        }

        self.flush_pending(entity, &id, draft)
    }

    /// Delete the parent row and all its companion rows
    ///
    /// The cascade runs unconditionally, independent of any staging
    /// state, so no orphaned translation rows survive the parent.
    pub fn delete<E: Translatable>(&self, entity: &E, id: impl Into<SqlValue>) -> Result<()> {
        let id = id.into();

        let removed = self.repo.delete_translations(entity, id.clone())?;
        debug!(
            "Cascade removed {} rows from {}",
            removed,
            l10n_table_name(entity.table(), self.repo.config())
        );

        self.repo.connection().execute(|conn| {
            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1",
                entity.table(),
                entity.primary_key()
            );
            conn.execute(&sql, [&id])?;
            Ok(())
        })
    }

    /// Flush the staged buffer through the repository, in staging order
    ///
    /// The buffer is consumed exactly once; the first failing locale
    /// aborts the loop and surfaces as a translation-write error.
    fn flush_pending<E: Translatable>(
        &self,
        entity: &E,
        id: &SqlValue,
        draft: &mut EntityDraft,
    ) -> Result<()> {
        if draft.pending().is_empty() {
            return Ok(());
        }

        let entries = draft.pending_mut().drain();
        debug!(
            "Flushing {} staged translation(s) for {} row {}",
            entries.len(),
            entity.table(),
            id
        );

        for (locale, attributes) in entries {
            let attribute_refs: Vec<(&str, &str)> = attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            self.repo
                .translate(entity, id.clone(), &attribute_refs, Some(&locale))?;
        }

        Ok(())
    }
}
