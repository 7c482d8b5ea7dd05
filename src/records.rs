/// Per-host record operations on top of a key-value store
///
/// Every mutation is a read of the whole record followed by a write of
/// the whole record. There is no locking: two mutations racing on the
/// same host resolve as last-write-wins.

use crate::config::ScratchpadConfig;
use crate::host::host_matches;
use crate::site_data::{FileRef, SiteRecord};
use crate::storage::{
    host_of, looks_like_legacy_record, record_key, KeyValueStore, StoreError,
};
use serde_json::Map;

#[derive(Debug, Clone)]
pub struct SiteStore<S> {
    store: S,
    config: ScratchpadConfig,
}

impl<S: KeyValueStore> SiteStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ScratchpadConfig::default())
    }

    pub fn with_config(store: S, config: ScratchpadConfig) -> Self {
        SiteStore { store, config }
    }

    pub fn config(&self) -> &ScratchpadConfig {
        &self.config
    }

    fn key_for(&self, host: &str) -> Result<String, StoreError> {
        if host.is_empty() {
            return Err(StoreError::EmptyHost);
        }
        Ok(record_key(&self.config.key_prefix, host))
    }

    async fn load(&self, key: &str) -> Result<Option<SiteRecord>, StoreError> {
        let mut found = self.store.get(&[key.to_string()]).await?;
        match found.remove(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn save(&self, key: String, record: &SiteRecord) -> Result<(), StoreError> {
        let mut items = Map::new();
        items.insert(key, serde_json::to_value(record)?);
        self.store.set(items).await
    }

    /// Read the record, apply `change`, and write it back if it reports a change
    async fn modify<F>(&self, host: &str, change: F) -> Result<SiteRecord, StoreError>
    where
        F: FnOnce(&mut SiteRecord) -> bool,
    {
        let key = self.key_for(host)?;
        let mut record = self.load(&key).await?.unwrap_or_default();

        if change(&mut record) {
            self.save(key, &record).await?;
            log::debug!("Saved record for {}", host);
        } else {
            log::debug!("No change for {}, skipping write", host);
        }

        Ok(record)
    }

    /// Create an empty record for `host` unless one exists
    pub async fn ensure_exists(&self, host: &str) -> Result<(), StoreError> {
        let key = self.key_for(host)?;
        if self.load(&key).await?.is_none() {
            self.save(key, &SiteRecord::new()).await?;
            log::info!("Created record for {}", host);
        }
        Ok(())
    }

    /// Stored record, or an empty one when the host has no data
    pub async fn get_record(&self, host: &str) -> Result<SiteRecord, StoreError> {
        let key = self.key_for(host)?;
        Ok(self.load(&key).await?.unwrap_or_default())
    }

    /// Hosts with a record, sorted ascending, filtered by case-insensitive substring
    pub async fn list_hosts(&self, filter: &str) -> Result<Vec<String>, StoreError> {
        let all = self.store.get_all().await?;
        let mut hosts: Vec<String> = all
            .keys()
            .filter_map(|key| host_of(&self.config.key_prefix, key))
            .filter(|host| host_matches(host, filter))
            .map(|host| host.to_string())
            .collect();

        hosts.sort();
        Ok(hosts)
    }

    pub async fn add_task(&self, host: &str, text: &str) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.add_task(text)).await
    }

    pub async fn toggle_task(&self, host: &str, index: usize) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.toggle_task(index)).await
    }

    pub async fn delete_task(&self, host: &str, index: usize) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.delete_task(index)).await
    }

    pub async fn clear_tasks(&self, host: &str) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.clear_tasks()).await
    }

    pub async fn update_notes(&self, host: &str, text: &str) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.update_notes(text)).await
    }

    pub async fn clear_notes(&self, host: &str) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.clear_notes()).await
    }

    pub async fn add_files(&self, host: &str, files: &[FileRef]) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.add_files(files)).await
    }

    pub async fn delete_file(&self, host: &str, index: usize) -> Result<SiteRecord, StoreError> {
        self.modify(host, |record| record.delete_file(index)).await
    }

    /// Delete everything stored for `host`
    pub async fn remove_host(&self, host: &str) -> Result<(), StoreError> {
        let key = self.key_for(host)?;
        self.store.remove(&key).await?;
        log::info!("Removed record for {}", host);
        Ok(())
    }

    /// Move records stored under bare hostnames into the key namespace
    ///
    /// A namespaced record that already exists wins over the bare one.
    /// Returns how many bare keys were moved.
    pub async fn migrate_legacy(&self) -> Result<usize, StoreError> {
        let all = self.store.get_all().await?;
        let prefix = &self.config.key_prefix;
        let mut migrated = 0;

        for (key, value) in all.iter() {
            if key.starts_with(prefix.as_str()) || !looks_like_legacy_record(value) {
                continue;
            }

            let record: SiteRecord = match serde_json::from_value(value.clone()) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Leaving legacy key {} in place: {}", key, e);
                    continue;
                }
            };

            let new_key = record_key(prefix, key);
            if !all.contains_key(&new_key) {
                self.save(new_key, &record).await?;
            }
            self.store.remove(key).await?;
            migrated += 1;
        }

        if migrated > 0 {
            log::info!("Migrated {} legacy site records", migrated);
        }
        Ok(migrated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_data::Task;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    fn new_store() -> (SiteStore<MemoryStore>, MemoryStore) {
        let memory = MemoryStore::new();
        (SiteStore::new(memory.clone()), memory)
    }

    fn seeded(entries: Value) -> (SiteStore<MemoryStore>, MemoryStore) {
        let map = match entries {
            Value::Object(map) => map,
            _ => panic!("seed must be an object"),
        };
        let memory = MemoryStore::with_entries(map);
        (SiteStore::new(memory.clone()), memory)
    }

    #[test]
    fn test_get_record_defaults_to_empty() {
        let (store, memory) = new_store();

        let record = block_on(store.get_record("example.com")).unwrap();

        assert_eq!(record, SiteRecord::new());
        assert!(memory.is_empty());
    }

    #[test]
    fn test_ensure_exists_is_idempotent() {
        let (store, memory) = new_store();

        block_on(async {
            store.ensure_exists("example.com").await.unwrap();
            store.add_task("example.com", "keep me").await.unwrap();
            store.ensure_exists("example.com").await.unwrap();

            let record = store.get_record("example.com").await.unwrap();
            assert_eq!(record.tasks.len(), 1);
        });

        assert_eq!(memory.len(), 1);
        assert!(memory.contains_key("site:example.com"));
    }

    #[test]
    fn test_add_task() {
        let (store, _) = new_store();

        let tasks = block_on(async {
            store.add_task("example.com", "buy milk").await.unwrap();
            store.get_record("example.com").await.unwrap().tasks
        });

        assert_eq!(tasks, vec![Task { text: "buy milk".to_string(), done: false }]);
    }

    #[test]
    fn test_blank_task_does_not_create_record() {
        let (store, memory) = new_store();

        block_on(store.add_task("example.com", "   ")).unwrap();

        assert!(memory.is_empty());
    }

    #[test]
    fn test_toggle_task_twice_restores() {
        let (store, _) = new_store();

        block_on(async {
            store.add_task("h.com", "a").await.unwrap();
            let once = store.toggle_task("h.com", 0).await.unwrap();
            assert!(once.tasks[0].done);
            let twice = store.toggle_task("h.com", 0).await.unwrap();
            assert!(!twice.tasks[0].done);
            assert_eq!(store.get_record("h.com").await.unwrap().tasks[0].done, false);
        });
    }

    #[test]
    fn test_delete_task_out_of_range_is_noop() {
        let (store, _) = new_store();

        block_on(async {
            store.add_task("h.com", "a").await.unwrap();
            store.add_task("h.com", "b").await.unwrap();
            let before = store.get_record("h.com").await.unwrap();

            let after = store.delete_task("h.com", 7).await.unwrap();

            assert_eq!(after, before);
            assert_eq!(store.get_record("h.com").await.unwrap(), before);
        });
    }

    #[test]
    fn test_delete_and_clear_tasks() {
        let (store, _) = new_store();

        block_on(async {
            for text in ["a", "b", "c"] {
                store.add_task("h.com", text).await.unwrap();
            }
            let record = store.delete_task("h.com", 0).await.unwrap();
            assert_eq!(record.tasks[0].text, "b");

            store.clear_tasks("h.com").await.unwrap();
            assert!(store.get_record("h.com").await.unwrap().tasks.is_empty());
        });
    }

    #[test]
    fn test_notes_round_trip_verbatim() {
        let (store, _) = new_store();

        block_on(async {
            store.update_notes("h.com", "hello\nworld").await.unwrap();
            assert_eq!(store.get_record("h.com").await.unwrap().notes, "hello\nworld");

            store.update_notes("h.com", "  padded  ").await.unwrap();
            assert_eq!(store.get_record("h.com").await.unwrap().notes, "  padded  ");

            store.clear_notes("h.com").await.unwrap();
            assert_eq!(store.get_record("h.com").await.unwrap().notes, "");
        });
    }

    #[test]
    fn test_add_files_to_fresh_host() {
        let (store, _) = new_store();

        block_on(async {
            store
                .add_files("example.com", &[FileRef::new("a.pdf", 2048)])
                .await
                .unwrap();

            let record = store.get_record("example.com").await.unwrap();
            assert_eq!(record.files, vec![FileRef::new("a.pdf", 2048)]);
            assert_eq!(store.list_hosts("").await.unwrap(), vec!["example.com".to_string()]);
        });
    }

    #[test]
    fn test_add_then_delete_file() {
        let (store, _) = new_store();

        block_on(async {
            store
                .add_files("h.com", &[FileRef::new("a", 1), FileRef::new("b", 2)])
                .await
                .unwrap();
            store.add_files("h.com", &[FileRef::new("c", 3)]).await.unwrap();

            let record = store.delete_file("h.com", 1).await.unwrap();
            let names: Vec<&str> = record.files.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["a", "c"]);

            let unchanged = store.delete_file("h.com", 9).await.unwrap();
            assert_eq!(unchanged, record);
        });
    }

    #[test]
    fn test_list_hosts_sorted_and_filtered() {
        let (store, _) = seeded(json!({
            "site:github.com": {"tasks": []},
            "site:example.com": {"notes": "x"},
            "site:gist.GitHub.com": {"files": []},
            "site:docs.rs": {},
            "settings": {"tasks": "not a record key"},
            "theme": "dark"
        }));

        block_on(async {
            let all = store.list_hosts("").await.unwrap();
            assert_eq!(all, vec!["docs.rs", "example.com", "gist.GitHub.com", "github.com"]);

            let git = store.list_hosts("git").await.unwrap();
            assert_eq!(git, vec!["gist.GitHub.com", "github.com"]);

            assert!(store.list_hosts("nothing").await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_remove_host() {
        let (store, _) = new_store();

        block_on(async {
            store.add_task("a.com", "x").await.unwrap();
            store.add_task("b.com", "y").await.unwrap();

            store.remove_host("a.com").await.unwrap();

            assert_eq!(store.get_record("a.com").await.unwrap(), SiteRecord::new());
            assert_eq!(store.list_hosts("").await.unwrap(), vec!["b.com".to_string()]);
        });
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let (store, memory) = new_store();

        let result = block_on(store.add_task("", "x"));

        assert!(matches!(result, Err(StoreError::EmptyHost)));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_undecodable_record_is_an_error() {
        let (store, _) = seeded(json!({"site:bad.com": {"tasks": "nope"}}));

        let result = block_on(store.get_record("bad.com"));

        match result {
            Err(StoreError::Decode { key, .. }) => assert_eq!(key, "site:bad.com"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_records_with_missing_or_null_fields_still_open() {
        let (store, _) = seeded(json!({
            "site:nulls.com": {"tasks": null, "notes": null, "files": null},
            "site:sparse.com": {"tasks": [{"done": true}], "files": [{"name": "a.pdf"}]}
        }));

        block_on(async {
            assert_eq!(store.get_record("nulls.com").await.unwrap(), SiteRecord::new());

            let sparse = store.toggle_task("sparse.com", 0).await.unwrap();
            assert_eq!(sparse.tasks, vec![Task { text: String::new(), done: false }]);
            assert_eq!(sparse.files, vec![FileRef::new("a.pdf", 0)]);
        });
    }

    #[test]
    fn test_custom_prefix() {
        let memory = MemoryStore::new();
        let config = ScratchpadConfig {
            key_prefix: "pad/".to_string(),
            ..ScratchpadConfig::default()
        };
        let store = SiteStore::with_config(memory.clone(), config);

        block_on(store.ensure_exists("example.com")).unwrap();

        assert!(memory.contains_key("pad/example.com"));
    }

    #[test]
    fn test_migrate_legacy_records() {
        let (store, memory) = seeded(json!({
            "example.com": {"tasks": [{"text": "old", "done": true}], "notes": "n", "files": []},
            "github.com": {"notes": "bare"},
            "site:github.com": {"notes": "namespaced"},
            "theme": "dark",
            "prefs": {"compact": true}
        }));

        block_on(async {
            let migrated = store.migrate_legacy().await.unwrap();
            assert_eq!(migrated, 2);

            let record = store.get_record("example.com").await.unwrap();
            assert_eq!(record.tasks, vec![Task { text: "old".to_string(), done: true }]);
            assert_eq!(store.get_record("github.com").await.unwrap().notes, "namespaced");

            assert_eq!(store.migrate_legacy().await.unwrap(), 0);
        });

        assert!(!memory.contains_key("example.com"));
        assert!(!memory.contains_key("github.com"));
        assert!(memory.contains_key("theme"));
        assert!(memory.contains_key("prefs"));
    }

    #[test]
    fn test_migrate_skips_malformed_legacy_values() {
        let (store, memory) = seeded(json!({"broken.com": {"tasks": 5}}));

        let migrated = block_on(store.migrate_legacy()).unwrap();

        assert_eq!(migrated, 0);
        assert!(memory.contains_key("broken.com"));
    }
}
