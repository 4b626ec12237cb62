//! Runtime session view.

use time::OffsetDateTime;

use crate::value::{Value, ValueMap};

/// Reserved key carrying the row's creation time through the value map.
pub const CREATED_ON: &str = "created_on";
/// Reserved key carrying the row's last-modified time through the value map.
pub const MODIFIED_ON: &str = "modified_on";
/// Reserved key carrying the row's expiry through the value map.
pub const EXPIRES_ON: &str = "expires_on";

/// The three reserved timestamp keys.
///
/// The store strips these from the value map before encoding the persisted
/// blob and reinjects them after a successful load. A caller may also set
/// `created_on` / `expires_on` before saving to override the computed
/// timestamps.
pub const RESERVED_KEYS: [&str; 3] = [CREATED_ON, MODIFIED_ON, EXPIRES_ON];

/// Cookie emission and expiry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie path attribute.
    pub path: String,
    /// Session lifetime in seconds. Non-positive means "destroy on save".
    pub max_age: i64,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
            // 14 days
            max_age: 60 * 60 * 24 * 14,
        }
    }
}

/// A per-client bag of key/value state tied to one persisted row.
///
/// Obtained from [`SeaOrmStore::lookup`](crate::SeaOrmStore::lookup) and
/// written back with [`SeaOrmStore::save`](crate::SeaOrmStore::save). The
/// identifier stays empty until the first save assigns a row.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) new: bool,
    /// Application-visible session state.
    pub values: ValueMap,
    /// Cookie options for this session, seeded from the store defaults.
    pub options: CookieOptions,
}

impl Session {
    pub(crate) fn new(name: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            new: true,
            values: ValueMap::new(),
            options,
        }
    }

    /// The stringified row identifier; empty until first persisted.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The cookie name this session travels under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this session has not yet been loaded from a live row.
    pub fn is_new(&self) -> bool {
        self.new
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Removes a value, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// The row creation time, present after a successful load.
    pub fn created_on(&self) -> Option<OffsetDateTime> {
        self.values.get(CREATED_ON).and_then(Value::as_timestamp)
    }

    /// The row expiry, present after a successful load. Setting
    /// [`EXPIRES_ON`] before a save overrides the computed expiry, subject
    /// to the renewal clamp.
    pub fn expires_on(&self) -> Option<OffsetDateTime> {
        self.values.get(EXPIRES_ON).and_then(Value::as_timestamp)
    }
}
