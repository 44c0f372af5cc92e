/*!
 * Active-locale context shared across repositories.
 *
 * Holds the "current locale" per entity type: reads and writes on a
 * translatable type resolve their locale through this context. The first
 * read for a type yields the configured default locale; an explicit set
 * sticks for the lifetime of the context. There is no automatic reset, so
 * callers that temporarily override a locale must restore it themselves
 * to avoid leaking locale state into unrelated operations.
 */

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared per-entity-type active locale state
///
/// Cloning is cheap and clones share the same underlying state, mirroring
/// how a single locale selection is visible to every repository handling
/// the same entity type.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    /// Locale returned for types that never had an explicit set
    default_locale: String,
    /// Explicitly set locale per entity type key
    active: Arc<RwLock<HashMap<String, String>>>,
}

impl LocaleContext {
    /// Create a context with the given system default locale
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            active: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the active locale for an entity type
    ///
    /// Returns the explicitly set locale for the type, or the system
    /// default if none has been set yet.
    pub fn active(&self, type_key: &str) -> String {
        self.active
            .read()
            .get(type_key)
            .cloned()
            .unwrap_or_else(|| self.default_locale.clone())
    }

    /// Set the active locale for an entity type
    ///
    /// Takes effect for all subsequent reads and writes on instances of
    /// that type until changed again. Locale codes are opaque strings and
    /// are not validated here.
    pub fn set_active(&self, type_key: &str, locale: impl Into<String>) {
        self.active
            .write()
            .insert(type_key.to_string(), locale.into());
    }

    /// The configured system default locale
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new("en")
    }
}
