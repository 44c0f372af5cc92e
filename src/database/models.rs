/*!
 * Entity descriptors, row models and staging buffers.
 *
 * These structures describe translatable entities to the repository layer
 * and carry data in and out of the database without tying callers to a
 * generated schema: rows are dynamic column maps, entities are runtime
 * descriptors.
 */

use std::collections::HashMap;
use std::fmt;

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};

/// A dynamically typed SQLite value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Text content, if this value is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer content, if this value is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Whether this value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(t) => write!(f, "{}", t),
            SqlValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Real(r) => ToSqlOutput::Owned(Value::Real(*r)),
            SqlValue::Text(t) => ToSqlOutput::Borrowed(ValueRef::Text(t.as_bytes())),
            SqlValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Text)
    }
}

/// Capability declared by entity types whose attributes vary by locale
///
/// An entity type opts into translation support by describing its table,
/// primary key and translatable attribute names. Everything else (companion
/// table name, foreign key, locale column) is derived from configuration
/// and the naming rules in [`super::schema`].
pub trait Translatable {
    /// Table holding the parent rows
    fn table(&self) -> &str;

    /// Primary key column name
    fn primary_key(&self) -> &str {
        "id"
    }

    /// Names of the attributes whose values vary by locale
    fn translatable_attributes(&self) -> &[String];

    /// Key scoping the active locale for this entity type
    fn type_key(&self) -> &str {
        self.table()
    }
}

/// Runtime descriptor of a translatable entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    /// Parent table name
    table: String,
    /// Primary key column name
    primary_key: String,
    /// Translatable attribute names
    translatable: Vec<String>,
}

impl EntityDef {
    /// Describe an entity with the default `id` primary key
    pub fn new(table: impl Into<String>, translatable: &[&str]) -> Self {
        Self {
            table: table.into(),
            primary_key: "id".to_string(),
            translatable: translatable.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the primary key column name
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }
}

impl Translatable for EntityDef {
    fn table(&self) -> &str {
        &self.table
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn translatable_attributes(&self) -> &[String] {
        &self.translatable
    }
}

/// One row read through the locale scope
///
/// Carries the parent's own columns plus the translatable attributes of
/// the matched locale, merged as if they were native columns. Attributes
/// with no translation for the active locale are Null.
#[derive(Debug, Clone, Default)]
pub struct LocalizedRow {
    columns: HashMap<String, SqlValue>,
}

impl LocalizedRow {
    pub(crate) fn new(columns: HashMap<String, SqlValue>) -> Self {
        Self { columns }
    }

    /// Value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    /// Text value of a column; None when absent or Null
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(SqlValue::as_str)
    }

    /// Integer value of a column; None when absent or Null
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_i64)
    }

    /// Whether the column is present but Null
    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).is_some_and(SqlValue::is_null)
    }

    /// Names of all columns carried by this row
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// One companion-table row, read back as stored
#[derive(Debug, Clone)]
pub struct TranslationRecord {
    /// Parent row this translation belongs to
    pub parent_id: SqlValue,
    /// Locale code of this row
    pub locale: String,
    /// Translatable attribute values
    pub attributes: HashMap<String, Option<String>>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

/// Staged translations awaiting the parent's persist
///
/// Attached to an [`EntityDraft`] before the parent row exists; consumed
/// exactly once by the write coordinator after the parent row is durably
/// written. Entries flush in the order they were staged.
#[derive(Debug, Clone, Default)]
pub struct PendingTranslations {
    entries: Vec<(String, Vec<(String, String)>)>,
}

impl PendingTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage attribute values for one locale
    ///
    /// Staging the same locale twice keeps both entries; the later flush
    /// upserts them in order, so the second write wins per attribute.
    pub fn stage(&mut self, locale: impl Into<String>, attributes: &[(&str, &str)]) -> &mut Self {
        let values = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.entries.push((locale.into(), values));
        self
    }

    /// Whether nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of staged locale entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Staged entries in staging order
    pub fn entries(&self) -> &[(String, Vec<(String, String)>)] {
        &self.entries
    }

    /// Drain all staged entries, leaving the buffer empty
    pub(crate) fn drain(&mut self) -> Vec<(String, Vec<(String, String)>)> {
        std::mem::take(&mut self.entries)
    }
}

/// A parent row about to be created or updated
///
/// Column values for the parent table itself, plus the staged
/// pending-translations buffer the coordinator flushes after the write.
#[derive(Debug, Clone, Default)]
pub struct EntityDraft {
    columns: Vec<(String, SqlValue)>,
    pending: PendingTranslations,
}

impl EntityDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parent column value
    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    /// Stage translations for one locale, to be flushed after the persist
    pub fn with_translations(mut self, locale: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        self.pending.stage(locale, attributes);
        self
    }

    /// Parent column values in assignment order
    pub fn columns(&self) -> &[(String, SqlValue)] {
        &self.columns
    }

    /// The staged pending-translations buffer
    pub fn pending(&self) -> &PendingTranslations {
        &self.pending
    }

    pub(crate) fn pending_mut(&mut self) -> &mut PendingTranslations {
        &mut self.pending
    }
}
