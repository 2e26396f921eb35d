//! Keyed JSON records.
//!
//! A [`RecordStore`] maps a key to one JSON document. Loading never
//! fails the caller: a missing record yields the type's default, and a
//! record that cannot be read or parsed is logged and treated the same.

mod fs;
mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;
use crate::model::Settings;

pub const CLIENTS_KEY: &str = "invoiceClients";
pub const SERVICES_KEY: &str = "invoiceServices";
pub const SETTINGS_KEY: &str = "invoiceSettings";
pub const DRAFTS_KEY: &str = "invoiceDrafts";

/// Raw string storage under string keys.
pub trait RecordStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the record under `key`. Must be atomic.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Read and parse the record under `key`.
pub fn load<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                key: key.to_string(),
                source,
            }),
    }
}

/// Like [`load`], but any failure falls back to `T::default()`.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: RecordStore + ?Sized,
{
    match load(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            warn!(key, error = %err, "unreadable record, using defaults");
            T::default()
        }
    }
}

pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: RecordStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Parse {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

pub fn load_settings<S: RecordStore + ?Sized>(store: &S) -> Settings {
    load_or_default(store, SETTINGS_KEY)
}

pub fn save_settings<S>(store: &S, settings: &Settings) -> Result<(), StoreError>
where
    S: RecordStore + ?Sized,
{
    save(store, SETTINGS_KEY, settings)
}
