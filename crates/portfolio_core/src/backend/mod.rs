//! Backing stores for the portfolio document.
//!
//! # Responsibility
//! - Define the injected backend contract: point read, full or merge write,
//!   change subscription.
//! - Provide the local durable slot and remote document implementations.
//!
//! # Invariants
//! - Backends exchange raw JSON trees; typed decoding belongs to the store.
//! - A `BackendSubscription` releases its registration exactly once, on
//!   `release()` or drop.

pub mod local;
pub mod remote;
pub mod service;
pub mod sqlite_service;

use crate::db::DbError;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use local::{SqliteSlotBackend, DEFAULT_SLOT_KEY};
pub use remote::RemoteDocumentBackend;
pub use service::{DocumentPath, DocumentService, InMemoryDocumentService, WatchId};
pub use sqlite_service::SqliteDocumentService;

pub type BackendResult<T> = Result<T, BackendError>;

/// Full stored document as of one committed write.
///
/// `revision` grows with commit order within one service, so a receiver can
/// drop a snapshot that arrives after a newer one.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub revision: u64,
    pub document: Value,
}

/// Callback receiving the full current document after every change.
pub type ChangeListener = Arc<dyn Fn(DocumentSnapshot) + Send + Sync>;

/// Backend storage or transport failure.
#[derive(Debug)]
pub enum BackendError {
    Db(DbError),
    Serde(serde_json::Error),
    /// Backend cannot be reached (offline service, poisoned state).
    Unavailable(String),
    /// Stored content is not a JSON object document.
    InvalidDocument(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "document serialization failed: {err}"),
            Self::Unavailable(message) => write!(f, "backend unavailable: {message}"),
            Self::InvalidDocument(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidDocument(_) => None,
        }
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Storage(value))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Backend shape selected by the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Single string-keyed slot, read once and overwritten on every change.
    Local,
    /// Named remote document with merge writes and live change delivery.
    Remote,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// How a write combines with the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Stored document becomes exactly `fields`.
    Replace,
    /// Each top-level key in `fields` replaces the stored key; others stay.
    Merge,
}

/// One write request against a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub mode: WriteMode,
    pub fields: Map<String, Value>,
}

impl DocumentWrite {
    pub fn replace(fields: Map<String, Value>) -> Self {
        Self {
            mode: WriteMode::Replace,
            fields,
        }
    }

    pub fn merge(fields: Map<String, Value>) -> Self {
        Self {
            mode: WriteMode::Merge,
            fields,
        }
    }
}

/// Injected persistence contract used by `DocumentStore`.
pub trait DocumentBackend: Send + Sync {
    fn kind(&self) -> BackendKind;
    /// Reads the stored document. `Ok(None)` means nothing was persisted yet.
    fn read(&self) -> BackendResult<Option<Value>>;
    fn write(&self, write: DocumentWrite) -> BackendResult<()>;
    /// Registers a change listener. Backends without change delivery return
    /// an inert subscription.
    fn subscribe(&self, listener: ChangeListener) -> BackendResult<BackendSubscription>;
}

/// Scoped change registration; unregisters when released or dropped.
pub struct BackendSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl BackendSubscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Subscription with nothing to release.
    pub fn inert() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for BackendSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for BackendSubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Interprets a stored JSON tree as a top-level document object.
pub(crate) fn expect_object(value: Value) -> BackendResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::InvalidDocument(format!(
            "expected object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::BackendSubscription;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn subscription_releases_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let subscription = BackendSubscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(subscription.is_active());
        drop(subscription);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_does_not_fire_again_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        BackendSubscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn inert_subscription_is_inactive() {
        assert!(!BackendSubscription::inert().is_active());
    }
}
