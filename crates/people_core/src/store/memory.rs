//! `RwLock`-guarded in-memory document collection.

use super::{Document, DocumentStore, OperationResult, StoreOptions, ID_FIELD};
use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

static GLOBAL_STORE: Lazy<MemoryStore> = Lazy::new(MemoryStore::new);

/// In-memory document collection keyed by `_id`, iterated in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<IndexMap<String, Document>>,
    options: StoreOptions,
}

impl MemoryStore {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Creates an empty store with explicit options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
            options,
        }
    }

    /// Process-wide store, created on first use and never torn down.
    pub fn global() -> &'static MemoryStore {
        &GLOBAL_STORE
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every mutation leaves the map consistent, so a poisoned lock is safe
    // to keep using.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Document>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Document>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    fn find_one(&self, id: &str) -> Option<Document> {
        self.read().get(id).cloned()
    }

    fn find_all(&self) -> Vec<Document> {
        self.read().values().cloned().collect()
    }

    fn insert_one(&self, document: Document) -> OperationResult {
        let Some(id) = document.get(ID_FIELD).and_then(Value::as_str).map(str::to_owned) else {
            warn!("event=store_insert module=store status=rejected reason=missing_id");
            return OperationResult::unacknowledged();
        };

        let mut documents = self.write();
        if documents.contains_key(&id) {
            warn!("event=store_insert module=store status=rejected reason=duplicate_id id={id}");
            return OperationResult::unacknowledged();
        }

        documents.insert(id.clone(), document);
        debug!("event=store_insert module=store status=ok id={id}");
        OperationResult::inserted(&id)
    }

    fn update_one(&self, id: &str, fields: Document) -> OperationResult {
        let mut documents = self.write();
        let guard = self.options.mutation_guard;
        if !guard.allows(documents.contains_key(id)) {
            debug!("event=store_update module=store status=skipped guard={guard:?} id={id}");
            return OperationResult::unacknowledged();
        }

        let Some(stored) = documents.get_mut(id) else {
            warn!("event=store_update module=store status=undefined guard={guard:?} id={id}");
            return OperationResult::unacknowledged();
        };

        for (field, value) in fields {
            if field != ID_FIELD {
                stored.insert(field, value);
            }
        }
        debug!("event=store_update module=store status=ok id={id}");
        OperationResult::modified(id)
    }

    fn delete_one(&self, id: &str) -> OperationResult {
        let mut documents = self.write();
        let guard = self.options.mutation_guard;
        if !guard.allows(documents.contains_key(id)) {
            debug!("event=store_delete module=store status=skipped guard={guard:?} id={id}");
            return OperationResult::unacknowledged();
        }

        if documents.shift_remove(id).is_none() {
            warn!("event=store_delete module=store status=undefined guard={guard:?} id={id}");
            return OperationResult::unacknowledged();
        }

        debug!("event=store_delete module=store status=ok id={id}");
        OperationResult::deleted(id)
    }

    fn delete_all(&self) {
        let mut documents = self.write();
        let removed = documents.len();
        documents.clear();
        debug!("event=store_clear module=store status=ok removed={removed}");
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::{
        Document, DocumentStore, MutationGuard, OperationResult, StoreOptions, ID_FIELD,
    };
    use serde_json::json;

    fn doc(id: &str, name: &str) -> Document {
        match json!({ ID_FIELD: id, "name": name }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn legacy_store() -> MemoryStore {
        MemoryStore::with_options(StoreOptions {
            mutation_guard: MutationGuard::RequireAbsent,
        })
    }

    #[test]
    fn insert_rejects_missing_and_duplicate_ids() {
        let store = MemoryStore::new();

        let mut no_id = doc("a", "Alice");
        no_id.remove(ID_FIELD);
        assert_eq!(store.insert_one(no_id), OperationResult::unacknowledged());

        let first = store.insert_one(doc("a", "Alice"));
        assert!(first.acknowledged);
        assert_eq!(first.inserted_id.as_deref(), Some("a"));

        let duplicate = store.insert_one(doc("a", "Other"));
        assert!(!duplicate.acknowledged);
        assert_eq!(store.find_one("a").unwrap()["name"], "Alice");
    }

    #[test]
    fn insert_rejects_non_string_id() {
        let store = MemoryStore::new();
        let mut numeric = doc("a", "Alice");
        numeric.insert(ID_FIELD.to_string(), json!(7));

        assert!(!store.insert_one(numeric).acknowledged);
        assert!(store.is_empty());
    }

    #[test]
    fn find_all_keeps_insertion_order_after_delete() {
        let store = MemoryStore::new();
        for id in ["c", "a", "b"] {
            store.insert_one(doc(id, id));
        }
        store.delete_one("a");

        let ids: Vec<_> = store
            .find_all()
            .into_iter()
            .map(|document| document[ID_FIELD].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["c", "b"]);
    }

    #[test]
    fn update_merges_fields_and_keeps_id() {
        let store = MemoryStore::new();
        store.insert_one(doc("a", "Alice"));

        let mut fields = doc("hijacked", "Alicia");
        fields.insert("city".to_string(), json!("Lisbon"));
        let result = store.update_one("a", fields);

        assert_eq!(result.modified_count, 1);
        assert_eq!(result.inserted_id.as_deref(), Some("a"));
        let stored = store.find_one("a").unwrap();
        assert_eq!(stored[ID_FIELD], "a");
        assert_eq!(stored["name"], "Alicia");
        assert_eq!(stored["city"], "Lisbon");
        assert!(store.find_one("hijacked").is_none());
    }

    #[test]
    fn update_and_delete_of_missing_id_are_unacknowledged() {
        let store = MemoryStore::new();

        assert_eq!(
            store.update_one("missing", Document::new()),
            OperationResult::unacknowledged()
        );
        assert_eq!(store.delete_one("missing"), OperationResult::unacknowledged());
    }

    #[test]
    fn legacy_guard_never_mutates() {
        let store = legacy_store();
        store.insert_one(doc("a", "Alice"));

        let mut fields = Document::new();
        fields.insert("name".to_string(), json!("Changed"));
        assert!(!store.update_one("a", fields.clone()).acknowledged);
        assert!(!store.update_one("missing", fields).acknowledged);
        assert!(!store.delete_one("a").acknowledged);
        assert!(!store.delete_one("missing").acknowledged);

        assert_eq!(store.len(), 1);
        assert_eq!(store.find_one("a").unwrap()["name"], "Alice");
        assert!(store.find_one("missing").is_none());
    }

    #[test]
    fn concurrent_inserts_from_shared_store_all_land() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 25;
        let store = MemoryStore::new();

        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let store = &store;
                scope.spawn(move || {
                    for item in 0..PER_THREAD {
                        let id = format!("t{thread}-{item}");
                        assert!(store.insert_one(doc(&id, "worker")).acknowledged);
                    }
                });
            }
        });

        assert_eq!(store.len(), THREADS * PER_THREAD);
        for thread in 0..THREADS {
            for item in 0..PER_THREAD {
                assert!(store.find_one(&format!("t{thread}-{item}")).is_some());
            }
        }
    }

    #[test]
    fn concurrent_duplicate_inserts_acknowledge_exactly_once() {
        let store = MemoryStore::new();
        let shared = &store;

        let acknowledged: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || shared.insert_one(doc("shared", "racer")).acknowledged)
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| usize::from(handle.join().unwrap()))
                .sum()
        });

        assert_eq!(acknowledged, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let store = MemoryStore::new();
        store.insert_one(doc("a", "Alice"));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = store.documents.write().unwrap();
            panic!("writer panicked while holding the lock");
        }));
        assert!(outcome.is_err());
        assert!(store.documents.is_poisoned());

        assert_eq!(store.find_all().len(), 1);
        assert!(store.insert_one(doc("b", "Bob")).acknowledged);
        assert_eq!(store.update_one("a", doc("a", "Alicia")).modified_count, 1);
        assert_eq!(store.find_one("a").unwrap()["name"], "Alicia");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_all_clears_everything() {
        let store = legacy_store();
        store.insert_one(doc("a", "Alice"));
        store.insert_one(doc("b", "Bob"));

        store.delete_all();

        assert!(store.is_empty());
        assert!(store.find_all().is_empty());
    }
}
