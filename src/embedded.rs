/*!
 * Embedded-strategy record wrapper.
 *
 * Wraps one parent row whose translatable attributes are stored as
 * embedded locale mappings. The record keeps the raw stored column values
 * and a staged-change layer for the current save cycle: assignments go
 * through the codec against both layers, so a write for one locale never
 * clobbers other locales and two writes before a single flush never
 * clobber each other. The caller owns persistence; after a successful
 * write it drains the staged layer back into the stored layer.
 */

use std::collections::HashMap;

use crate::codec::{self, LocaleMap, LocalizedValue};
use crate::errors::CodecError;
use crate::locale::LocaleContext;

/// One parent row with embedded locale-mapping columns
#[derive(Debug, Clone)]
pub struct EmbeddedRecord {
    /// Entity type key used to resolve the active locale
    type_key: String,
    /// Attribute names stored as embedded locale mappings
    translatable: Vec<String>,
    /// Raw column values as last loaded from or persisted to storage
    stored: HashMap<String, Option<String>>,
    /// Encoded values staged in the current save cycle
    dirty: HashMap<String, String>,
}

impl EmbeddedRecord {
    /// Create an empty record for the given entity type
    pub fn new(type_key: impl Into<String>, translatable: Vec<String>) -> Self {
        Self {
            type_key: type_key.into(),
            translatable,
            stored: HashMap::new(),
            dirty: HashMap::new(),
        }
    }

    /// Create a record from raw column values loaded from storage
    pub fn from_stored(
        type_key: impl Into<String>,
        translatable: Vec<String>,
        stored: HashMap<String, Option<String>>,
    ) -> Self {
        Self {
            type_key: type_key.into(),
            translatable,
            stored,
            dirty: HashMap::new(),
        }
    }

    /// Whether the attribute is declared as translatable on this record
    pub fn is_translatable(&self, attribute: &str) -> bool {
        self.translatable.iter().any(|a| a == attribute)
    }

    /// Raw stored value of a column, bypassing the codec
    pub fn raw(&self, attribute: &str) -> Option<&str> {
        self.dirty
            .get(attribute)
            .map(String::as_str)
            .or_else(|| self.stored.get(attribute).and_then(Option::as_deref))
    }

    /// Read a translatable attribute for the active locale
    ///
    /// Staged writes from the current cycle win over the stored value.
    /// Returns None when the attribute has no entry for the locale.
    pub fn get(&self, attribute: &str, ctx: &LocaleContext) -> Result<Option<String>, CodecError> {
        let locale = ctx.active(&self.type_key);
        codec::decode(self.raw(attribute), &locale)
    }

    /// Assign a translatable attribute for the active locale
    ///
    /// The new value is merged against the stored mapping and any change
    /// already staged this cycle, then staged for the next flush.
    pub fn set(
        &mut self,
        attribute: &str,
        value: Option<&str>,
        ctx: &LocaleContext,
    ) -> Result<(), CodecError> {
        let locale = ctx.active(&self.type_key);
        let encoded = codec::encode(
            self.stored.get(attribute).and_then(Option::as_deref),
            self.dirty.get(attribute).map(String::as_str),
            LocalizedValue::Scalar(value.map(String::from)),
            &locale,
        )?;
        self.dirty.insert(attribute.to_string(), encoded);
        Ok(())
    }

    /// Replace the whole locale mapping of a translatable attribute
    pub fn set_all(&mut self, attribute: &str, mapping: LocaleMap) -> Result<(), CodecError> {
        // A full-map write replaces the mapping outright; the locale
        // argument is never consulted on that path.
        let encoded = codec::encode(
            self.stored.get(attribute).and_then(Option::as_deref),
            self.dirty.get(attribute).map(String::as_str),
            LocalizedValue::Map(mapping),
            "",
        )?;
        self.dirty.insert(attribute.to_string(), encoded);
        Ok(())
    }

    /// Whether any attribute has a staged change
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Staged encoded values, keyed by attribute, for building the write
    pub fn dirty(&self) -> &HashMap<String, String> {
        &self.dirty
    }

    /// Drain staged changes into the stored layer
    ///
    /// Call after the staged values were durably persisted; returns the
    /// drained attribute/value pairs.
    pub fn flush_dirty(&mut self) -> HashMap<String, String> {
        let drained = std::mem::take(&mut self.dirty);
        for (attribute, encoded) in &drained {
            self.stored
                .insert(attribute.clone(), Some(encoded.clone()));
        }
        drained
    }
}
