/// Key-value storage abstraction over chrome.storage.local

use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error("stored value under {key} is not a site record: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode site record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("host must not be empty")]
    EmptyHost,
}

/// Asynchronous string-keyed store, shaped after `chrome.storage.local`
///
/// Each method is one round trip to the backend. Nothing here orders
/// writes from different callers.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_all(&self) -> Result<Map<String, Value>, StoreError>;

    /// Missing keys are absent from the returned map
    async fn get(&self, keys: &[String]) -> Result<Map<String, Value>, StoreError>;

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Map<String, Value>) -> Self {
        MemoryStore {
            entries: Rc::new(RefCell::new(entries)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_all(&self) -> Result<Map<String, Value>, StoreError> {
        Ok(self.entries.borrow().clone())
    }

    async fn get(&self, keys: &[String]) -> Result<Map<String, Value>, StoreError> {
        let entries = self.entries.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        self.entries.borrow_mut().extend(items);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage key for a host's record
pub fn record_key(prefix: &str, host: &str) -> String {
    format!("{}{}", prefix, host)
}

/// Host named by a record key, `None` for keys outside the namespace
pub fn host_of<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(prefix).filter(|host| !host.is_empty())
}

/// Whether a value written by the pre-namespace layout looks like a record
pub fn looks_like_legacy_record(value: &Value) -> bool {
    value
        .as_object()
        .map_or(false, |obj| ["tasks", "notes", "files"].iter().any(|field| obj.contains_key(*field)))
}
