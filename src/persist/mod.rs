//! Key-value persistence substrate and the typed record store over it.

/// In-memory key-value map.
pub mod memory;
/// SQLite-backed key-value table.
pub mod sqlite;

use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{DeserializeOwned, MapAccess, SeqAccess, Visitor},
};
use tracing::{debug, warn};

use crate::{
    application::{ApplicationRecord, ReviewEntry, ShortlistEntry},
    config::StorageConfig,
    core::store::LedgerSnapshot,
};

/// Failure of the persistence substrate or of encoding a collection.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A collection could not be encoded as JSON.
    #[error("json encode error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// String-keyed, string-valued storage, like a browser's local storage.
pub trait KvStore {
    /// Raw stored value for `key`.
    fn get_raw(&self, key: &str) -> PersistResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_raw(&mut self, key: &str, value: &str) -> PersistResult<()>;
    /// Deletes `key`; missing keys are not an error.
    fn remove(&mut self, key: &str) -> PersistResult<()>;
}

impl<K: KvStore + ?Sized> KvStore for Box<K> {
    fn get_raw(&self, key: &str) -> PersistResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> PersistResult<()> {
        (**self).set_raw(key, value)
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        (**self).remove(key)
    }
}

/// Stored decision collection in either accepted shape.
///
/// Writes always produce a JSON array. Reads also accept an object keyed per
/// decision (`{"a_COSC1234_tutor": {...}}`) and keep its entries in document
/// order; the keys themselves are dropped since every entry carries its own.
struct Collection<T>(Vec<T>);

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for CollectionVisitor<T> {
            type Value = Collection<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of entries or an object of keyed entries")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element()? {
                    out.push(entry);
                }
                Ok(Collection(out))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, entry)) = map.next_entry::<String, T>()? {
                    out.push(entry);
                }
                Ok(Collection(out))
            }
        }

        deserializer.deserialize_any(CollectionVisitor(PhantomData))
    }
}

/// Typed JSON collections over a [`KvStore`].
///
/// A missing or undecodable value loads as the type's default (an empty
/// collection) and is logged; only substrate failures surface as errors.
pub struct RecordStore<K: KvStore> {
    kv: K,
    keys: StorageConfig,
}

impl<K: KvStore> RecordStore<K> {
    /// Wraps `kv`, reading collections under the configured key names.
    pub fn new(kv: K, keys: StorageConfig) -> Self {
        Self { kv, keys }
    }

    /// Underlying key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Consumes the adapter and returns the key-value store.
    pub fn into_inner(self) -> K {
        self.kv
    }

    /// Loads and decodes `key`, defaulting when absent or malformed.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> PersistResult<T> {
        let Some(raw) = self.kv.get_raw(key)? else {
            debug!(key, "collection missing, using empty default");
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, %err, "stored collection is malformed, using empty default");
                Ok(T::default())
            }
        }
    }

    /// Encodes and stores `value` under `key`.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> PersistResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set_raw(key, &raw)
    }

    /// Removes `key`.
    pub fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.kv.remove(key)
    }

    /// Loads the applicant collection.
    pub fn load_applicants(&self) -> PersistResult<Vec<ApplicationRecord>> {
        self.load(&self.keys.applicants_key)
    }

    /// Stores the applicant collection.
    pub fn save_applicants(&mut self, applicants: &[ApplicationRecord]) -> PersistResult<()> {
        let key = self.keys.applicants_key.clone();
        self.save(&key, applicants)
    }

    /// Loads a decision collection stored as an array or a keyed object.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> PersistResult<Vec<T>> {
        let Collection(entries) = self.load(key)?;
        Ok(entries)
    }

    /// Loads the per-course review collection.
    pub fn load_reviews(&self) -> PersistResult<Vec<ReviewEntry>> {
        self.load_collection(&self.keys.reviews_key)
    }

    /// Stores the per-course review collection.
    pub fn save_reviews(&mut self, reviews: &[ReviewEntry]) -> PersistResult<()> {
        let key = self.keys.reviews_key.clone();
        self.save(&key, reviews)
    }

    /// Loads the flat shortlist.
    pub fn load_shortlist(&self) -> PersistResult<Vec<ShortlistEntry>> {
        self.load_collection(&self.keys.shortlist_key)
    }

    /// Stores the flat shortlist.
    pub fn save_shortlist(&mut self, shortlist: &[ShortlistEntry]) -> PersistResult<()> {
        let key = self.keys.shortlist_key.clone();
        self.save(&key, shortlist)
    }

    /// Loads all three collections.
    pub fn load_snapshot(&self) -> PersistResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            applicants: self.load_applicants()?,
            reviews: self.load_reviews()?,
            shortlist: self.load_shortlist()?,
        })
    }

    /// Stores all three collections.
    pub fn save_snapshot(&mut self, snapshot: &LedgerSnapshot) -> PersistResult<()> {
        self.save_applicants(&snapshot.applicants)?;
        self.save_reviews(&snapshot.reviews)?;
        self.save_shortlist(&snapshot.shortlist)
    }
}
