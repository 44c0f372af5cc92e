/*!
 * Embedded-strategy codec for localized attribute values.
 *
 * One stored column holds every locale's value for an attribute as a JSON
 * object, e.g. `{"en": "Post Title", "ar": "عنوان المنشور"}`. Reading
 * returns only the requested locale's entry; writing merges the new value
 * into the previously stored mapping so a write for one locale never
 * erases values written for other locales.
 */

use std::collections::BTreeMap;

use crate::errors::CodecError;

/// Decoded per-attribute mapping of locale code to stored value
pub type LocaleMap = BTreeMap<String, Option<String>>;

/// A value being assigned to a translatable attribute
///
/// Attribute assignment is normally single-valued: a scalar lands in the
/// entry for one locale. A caller may instead supply the entire per-locale
/// mapping at once, which replaces the stored mapping wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalizedValue {
    /// Value for a single locale; None stores an explicit null entry
    Scalar(Option<String>),
    /// Full locale mapping, replacing whatever was stored before
    Map(LocaleMap),
}

impl From<&str> for LocalizedValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Some(value.to_string()))
    }
}

impl From<String> for LocalizedValue {
    fn from(value: String) -> Self {
        Self::Scalar(Some(value))
    }
}

/// Parse a stored column value into its locale mapping
///
/// An absent or empty stored value decodes to an empty mapping. A
/// non-empty value that is not a valid JSON locale mapping fails with
/// [`CodecError::MalformedData`].
pub fn decode_map(raw: Option<&str>) -> Result<LocaleMap, CodecError> {
    match raw {
        None => Ok(LocaleMap::new()),
        Some(text) if text.is_empty() => Ok(LocaleMap::new()),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| CodecError::MalformedData {
                detail: e.to_string(),
            })
        }
    }
}

/// Read the stored value for one locale
///
/// Returns None when the column is empty or the locale has no entry; a
/// locale that was explicitly written as null reads the same way.
pub fn decode(raw: Option<&str>, locale: &str) -> Result<Option<String>, CodecError> {
    let map = decode_map(raw)?;
    Ok(map.get(locale).cloned().flatten())
}

/// Merge a new write into the stored mapping and re-serialize it
///
/// The mapping is reconstructed in order from `prior` (the last-persisted
/// column value) and `pending` (a change already staged in the same save
/// cycle, so two writes to the attribute before a flush do not clobber
/// each other), then the new value is applied: a scalar sets only the
/// entry for `locale`, a full map replaces the merged mapping.
pub fn encode(
    prior: Option<&str>,
    pending: Option<&str>,
    value: LocalizedValue,
    locale: &str,
) -> Result<String, CodecError> {
    let mut map = decode_map(prior)?;
    map.extend(decode_map(pending)?);

    match value {
        LocalizedValue::Scalar(scalar) => {
            map.insert(locale.to_string(), scalar);
        }
        LocalizedValue::Map(replacement) => {
            map = replacement;
        }
    }

    serde_json::to_string(&map).map_err(CodecError::Serialize)
}
