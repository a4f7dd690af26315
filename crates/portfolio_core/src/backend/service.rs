//! Remote document service contract and the in-process implementation.
//!
//! # Responsibility
//! - Address documents by `collection/document` path.
//! - Provide point read, top-level field-merge write and change watching.
//!
//! # Invariants
//! - Every successful write notifies all watchers of that path with the full
//!   stored document, whichever client wrote it.
//! - Watchers are invoked without any service lock held.
//! - Snapshot revisions are assigned while the data lock is held, so they
//!   follow commit order even when deliveries interleave.
//! - Concurrent merge writes are last-writer-wins per top-level key.

use crate::backend::{
    expect_object, BackendError, BackendResult, ChangeListener, DocumentSnapshot,
};
use crate::merge::merge_top_level;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Collection used by the portfolio site.
pub const DEFAULT_COLLECTION: &str = "portfolio";
/// Document id used by the portfolio site.
pub const DEFAULT_DOCUMENT: &str = "mainData";

/// Fixed address of one remote document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPath {
    pub collection: String,
    pub document: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            document: document.into(),
        }
    }
}

impl Default for DocumentPath {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION, DEFAULT_DOCUMENT)
    }
}

impl Display for DocumentPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.document)
    }
}

/// Handle identifying one watcher registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(u64);

/// Document service reachable by several clients at once.
pub trait DocumentService: Send + Sync {
    fn get(&self, path: &DocumentPath) -> BackendResult<Option<Value>>;
    /// Writes `fields`. With `merge`, each top-level key replaces the stored
    /// key and untouched keys survive; without it the document is replaced.
    fn set(&self, path: &DocumentPath, fields: Map<String, Value>, merge: bool)
        -> BackendResult<()>;
    fn watch(&self, path: &DocumentPath, listener: ChangeListener) -> BackendResult<WatchId>;
    fn unwatch(&self, path: &DocumentPath, id: WatchId);
}

/// Watcher bookkeeping shared by service implementations.
#[derive(Default)]
pub struct WatchRegistry {
    next_id: AtomicU64,
    watchers: Mutex<BTreeMap<DocumentPath, BTreeMap<WatchId, ChangeListener>>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: &DocumentPath, listener: ChangeListener) -> WatchId {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock()
            .entry(path.clone())
            .or_default()
            .insert(id, listener);
        id
    }

    pub fn remove(&self, path: &DocumentPath, id: WatchId) {
        let mut watchers = self.lock();
        if let Some(listeners) = watchers.get_mut(path) {
            listeners.remove(&id);
            if listeners.is_empty() {
                watchers.remove(path);
            }
        }
    }

    pub fn count(&self, path: &DocumentPath) -> usize {
        self.lock().get(path).map_or(0, BTreeMap::len)
    }

    /// Delivers `snapshot` to every watcher of `path`.
    pub fn notify(&self, path: &DocumentPath, snapshot: &DocumentSnapshot) {
        let listeners: Vec<ChangeListener> = self
            .lock()
            .get(path)
            .map(|listeners| listeners.values().cloned().collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(snapshot.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<DocumentPath, BTreeMap<WatchId, ChangeListener>>> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process document service shared between clients through `Arc`.
pub struct InMemoryDocumentService {
    documents: Mutex<BTreeMap<DocumentPath, Map<String, Value>>>,
    watchers: WatchRegistry,
    online: AtomicBool,
    revision: AtomicU64,
}

impl Default for InMemoryDocumentService {
    fn default() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            watchers: WatchRegistry::new(),
            online: AtomicBool::new(true),
            revision: AtomicU64::new(0),
        }
    }
}

impl InMemoryDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles reachability; offline services fail every read and write.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn watcher_count(&self, path: &DocumentPath) -> usize {
        self.watchers.count(path)
    }

    fn ensure_online(&self, path: &DocumentPath) -> BackendResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable(format!(
                "document service offline for `{path}`"
            )))
        }
    }

    fn documents(&self) -> MutexGuard<'_, BTreeMap<DocumentPath, Map<String, Value>>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentService for InMemoryDocumentService {
    fn get(&self, path: &DocumentPath) -> BackendResult<Option<Value>> {
        self.ensure_online(path)?;
        Ok(self.documents().get(path).cloned().map(Value::Object))
    }

    fn set(
        &self,
        path: &DocumentPath,
        fields: Map<String, Value>,
        merge: bool,
    ) -> BackendResult<()> {
        self.ensure_online(path)?;
        let snapshot = {
            let mut documents = self.documents();
            let stored = documents.entry(path.clone()).or_default();
            if merge {
                merge_top_level(stored, fields);
            } else {
                *stored = fields;
            }
            DocumentSnapshot {
                revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
                document: Value::Object(stored.clone()),
            }
        };
        self.watchers.notify(path, &snapshot);
        Ok(())
    }

    fn watch(&self, path: &DocumentPath, listener: ChangeListener) -> BackendResult<WatchId> {
        self.ensure_online(path)?;
        Ok(self.watchers.add(path, listener))
    }

    fn unwatch(&self, path: &DocumentPath, id: WatchId) {
        self.watchers.remove(path, id);
    }
}

/// Decodes stored document text into a top-level object.
pub(crate) fn decode_document(raw: &str) -> BackendResult<Map<String, Value>> {
    expect_object(serde_json::from_str(raw)?)
}
