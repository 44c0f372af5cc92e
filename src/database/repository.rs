/*!
 * Companion-table repository for translatable entities.
 *
 * This module provides the read and write paths of the companion-table
 * strategy: locale-scoped queries that merge the active locale's
 * translation row into the parent row via a left join, upsert-based
 * translation writes keyed on (parent, locale), and per-locale deletion.
 *
 * The locale scope is applied at query construction time; the
 * `*_without_translations` variants are the explicit way to opt out and
 * query the bare parent table.
 */

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use log::debug;
use rusqlite::{Connection, params_from_iter};

use crate::app_config::Config;
use crate::errors::RepositoryError;
use crate::locale::LocaleContext;

use super::connection::DatabaseConnection;
use super::models::{LocalizedRow, SqlValue, Translatable, TranslationRecord};
use super::schema::{l10n_foreign_key, l10n_table_name};

/// Repository for companion-table translation operations
#[derive(Clone)]
pub struct CompanionRepository {
    /// Database connection
    db: DatabaseConnection,
    /// Naming configuration (table postfix, locale column)
    config: Config,
    /// Shared active-locale state
    ctx: LocaleContext,
}

impl CompanionRepository {
    /// Create a new repository over the given connection
    pub fn new(db: DatabaseConnection, config: Config, ctx: LocaleContext) -> Self {
        Self { db, config, ctx }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let config = Config::default();
        let ctx = LocaleContext::new(config.default_locale.clone());
        Ok(Self::new(DatabaseConnection::new_in_memory()?, config, ctx))
    }

    /// The shared locale context
    pub fn context(&self) -> &LocaleContext {
        &self.ctx
    }

    /// The naming configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying connection, for enclosing transactions
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Set the active locale for an entity type and return the repository
    ///
    /// The locale sticks until changed again; this is a plain context
    /// write offered in chainable form for call sites like
    /// `repo.use_locale(&post, "ar").find(&post, 1)`.
    pub fn use_locale<E: Translatable>(&self, entity: &E, locale: &str) -> &Self {
        self.ctx.set_active(entity.type_key(), locale);
        self
    }

    // =========================================================================
    // Locale-scoped reads
    // =========================================================================

    /// Find one parent row by primary key, merged with the active locale
    ///
    /// The companion table is left-joined on the foreign key and the
    /// active locale, so a parent row with no translation for that locale
    /// still comes back, carrying Null for each translatable attribute.
    pub fn find<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
    ) -> Result<Option<LocalizedRow>> {
        let locale = self.ctx.active(entity.type_key());
        let sql = format!(
            "{} WHERE p.{} = ?2",
            self.scoped_select(entity),
            entity.primary_key()
        );
        let id = id.into();
        debug!("Locale-scoped find on {} ({})", entity.table(), locale);

        self.db.execute(|conn| {
            let mut rows = Self::query_rows(conn, &sql, &[SqlValue::Text(locale), id])?;
            Ok(rows.pop())
        })
    }

    /// All parent rows, merged with the active locale
    pub fn all<E: Translatable>(&self, entity: &E) -> Result<Vec<LocalizedRow>> {
        let locale = self.ctx.active(entity.type_key());
        let sql = format!("{} ORDER BY p.{}", self.scoped_select(entity), entity.primary_key());

        self.db
            .execute(|conn| Self::query_rows(conn, &sql, &[SqlValue::Text(locale)]))
    }

    /// Find one parent row without the locale scope
    pub fn find_without_translations<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
    ) -> Result<Option<LocalizedRow>> {
        let sql = format!(
            "SELECT p.* FROM {} AS p WHERE p.{} = ?1",
            entity.table(),
            entity.primary_key()
        );

        let id = id.into();
        self.db.execute(|conn| {
            let mut rows = Self::query_rows(conn, &sql, &[id])?;
            Ok(rows.pop())
        })
    }

    /// All parent rows without the locale scope
    pub fn all_without_translations<E: Translatable>(&self, entity: &E) -> Result<Vec<LocalizedRow>> {
        let sql = format!(
            "SELECT p.* FROM {} AS p ORDER BY p.{}",
            entity.table(),
            entity.primary_key()
        );

        self.db.execute(|conn| Self::query_rows(conn, &sql, &[]))
    }

    /// Build the locale-scoped SELECT for an entity
    ///
    /// Selects the parent's own columns plus the declared translatable
    /// attributes from the companion table; the join predicate binds the
    /// active locale at position ?1.
    fn scoped_select<E: Translatable>(&self, entity: &E) -> String {
        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());

        let mut attribute_columns = String::new();
        for attribute in entity.translatable_attributes() {
            attribute_columns.push_str(&format!(", t.{}", attribute));
        }

        format!(
            "SELECT p.*{} FROM {} AS p LEFT JOIN {} AS t ON t.{} = p.{} AND t.{} = ?1",
            attribute_columns,
            entity.table(),
            l10n_table,
            foreign_key,
            entity.primary_key(),
            self.config.locale_key,
        )
    }

    /// Run a query and collect each result row as a dynamic column map
    ///
    /// Columns are keyed by result name, so a translatable attribute from
    /// the join shadows a parent column of the same name.
    fn query_rows(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<Vec<LocalizedRow>> {
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            let mut columns = HashMap::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                columns.insert(name.clone(), SqlValue::from(row.get_ref(i)?));
            }
            Ok(LocalizedRow::new(columns))
        })?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    // =========================================================================
    // Translation writes
    // =========================================================================

    /// Upsert one locale's attribute values for a parent row
    ///
    /// The target locale is the explicit argument if given, otherwise the
    /// entity type's active locale; the active locale itself is never
    /// changed by this call. Inserts a companion row when the
    /// (foreign key, locale) identity is absent, else updates exactly the
    /// given attribute columns, leaving other locales' rows untouched.
    pub fn translate<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
        attributes: &[(&str, &str)],
        locale: Option<&str>,
    ) -> Result<()> {
        let target = locale
            .map(str::to_string)
            .unwrap_or_else(|| self.ctx.active(entity.type_key()));

        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());
        let now = Utc::now().to_rfc3339();

        let mut insert_columns = format!("{}, {}", foreign_key, self.config.locale_key);
        let mut placeholders = "?1, ?2".to_string();
        let mut updates = String::new();
        let mut params: Vec<SqlValue> = vec![id.into(), SqlValue::Text(target.clone())];

        for (name, value) in attributes {
            params.push(SqlValue::Text(value.to_string()));
            insert_columns.push_str(&format!(", {}", name));
            placeholders.push_str(&format!(", ?{}", params.len()));
            updates.push_str(&format!("{} = excluded.{}, ", name, name));
        }

        params.push(SqlValue::Text(now.clone()));
        let created_at_pos = params.len();
        params.push(SqlValue::Text(now));
        let updated_at_pos = params.len();

        let sql = format!(
            "INSERT INTO {} ({}, created_at, updated_at) VALUES ({}, ?{}, ?{}) \
             ON CONFLICT({}, {}) DO UPDATE SET {}updated_at = excluded.updated_at",
            l10n_table,
            insert_columns,
            placeholders,
            created_at_pos,
            updated_at_pos,
            foreign_key,
            self.config.locale_key,
            updates,
        );

        debug!("Upserting translation '{}' into {}", target, l10n_table);

        self.db.execute(|conn| {
            conn.execute(&sql, params_from_iter(params.iter()))
                .map_err(|source| RepositoryError::TranslationWrite {
                    locale: target.clone(),
                    source,
                })?;
            Ok(())
        })
    }

    /// Delete the companion rows of a parent for the given locales
    ///
    /// Rows for other locales are left intact. Returns the number of
    /// deleted rows.
    pub fn delete_translation<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
        locales: &[&str],
    ) -> Result<usize> {
        if locales.is_empty() {
            return Ok(0);
        }

        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());

        let placeholders: Vec<String> = (2..=locales.len() + 1).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1 AND {} IN ({})",
            l10n_table,
            foreign_key,
            self.config.locale_key,
            placeholders.join(", ")
        );

        let mut params: Vec<SqlValue> = vec![id.into()];
        params.extend(locales.iter().map(|l| SqlValue::Text(l.to_string())));

        self.db
            .execute(|conn| Ok(conn.execute(&sql, params_from_iter(params.iter()))?))
    }

    /// Delete every companion row of a parent
    ///
    /// Invoked by the write coordinator when the parent is deleted, so no
    /// orphaned translation rows survive. Returns the number of deleted
    /// rows.
    pub fn delete_translations<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
    ) -> Result<usize> {
        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());

        let sql = format!("DELETE FROM {} WHERE {} = ?1", l10n_table, foreign_key);
        let id = id.into();

        self.db
            .execute(|conn| Ok(conn.execute(&sql, [&id])?))
    }

    // =========================================================================
    // Translation reads
    // =========================================================================

    /// All companion rows of a parent, ordered by locale
    pub fn translations_of<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
    ) -> Result<Vec<TranslationRecord>> {
        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());
        let locale_key = self.config.locale_key.clone();

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 ORDER BY {}",
            l10n_table, foreign_key, locale_key
        );
        let id = id.into();

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

            let rows = stmt.query_map([&id], |row| {
                let mut parent_id = SqlValue::Null;
                let mut locale = String::new();
                let mut created_at = String::new();
                let mut updated_at = String::new();
                let mut attributes = HashMap::new();

                for (i, name) in names.iter().enumerate() {
                    let value = SqlValue::from(row.get_ref(i)?);
                    if *name == foreign_key {
                        parent_id = value;
                    } else if *name == locale_key {
                        locale = value.as_str().unwrap_or_default().to_string();
                    } else if name == "created_at" {
                        created_at = value.as_str().unwrap_or_default().to_string();
                    } else if name == "updated_at" {
                        updated_at = value.as_str().unwrap_or_default().to_string();
                    } else {
                        attributes.insert(name.clone(), value.as_str().map(String::from));
                    }
                }

                Ok(TranslationRecord {
                    parent_id,
                    locale,
                    attributes,
                    created_at,
                    updated_at,
                })
            })?;

            Ok(rows.filter_map(|r| r.ok()).collect())
        })
    }

    /// Number of companion rows of a parent
    pub fn translations_count<E: Translatable>(
        &self,
        entity: &E,
        id: impl Into<SqlValue>,
    ) -> Result<i64> {
        let l10n_table = l10n_table_name(entity.table(), &self.config);
        let foreign_key = l10n_foreign_key(entity.table(), entity.primary_key());

        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", l10n_table, foreign_key);
        let id = id.into();

        self.db
            .execute(|conn| Ok(conn.query_row(&sql, [&id], |row| row.get(0))?))
    }
}
