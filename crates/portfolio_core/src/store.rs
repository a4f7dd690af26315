//! Document store: single source of truth for the portfolio document.
//!
//! # Responsibility
//! - Load the document once at startup, reconciling persisted state with the
//!   compiled-in defaults.
//! - Apply shallow partial updates and persist them best-effort.
//! - Follow remote changes and fan them out to store listeners.
//!
//! # Invariants
//! - `load` and `update_data` never fail; backend problems are logged and the
//!   in-memory document stays the working copy.
//! - No store lock is held while calling the backend or a listener.
//! - Remote snapshots get the same defaults overlay as `load`; a snapshot
//!   older than the last applied one is dropped.
//! - A local slot that could not be read is never overwritten by this store.
//! - The backend subscription lives exactly as long as the store (or until
//!   `close`).

use crate::backend::{
    BackendError, BackendKind, BackendSubscription, ChangeListener, DocumentBackend,
    DocumentSnapshot, DocumentWrite,
};
use crate::defaults::{default_document, default_document_value};
use crate::merge::{apply_partial, overlay_defaults};
use crate::model::document::{PartialPortfolioDocument, PortfolioDocument};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

/// Callback invoked with the current document after every change.
pub type StoreListener = Arc<dyn Fn(&PortfolioDocument) + Send + Sync>;

/// Where the loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing was persisted; compiled-in defaults were used and seeded.
    Defaults,
    /// Persisted document merged under the compiled-in defaults.
    Persisted,
    /// Backend read or decode failed; compiled-in defaults were used.
    Fallback,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Persisted => "persisted",
            Self::Fallback => "fallback",
        }
    }
}

/// Result of `DocumentStore::load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub document: PortfolioDocument,
    pub is_loading: bool,
    pub source: LoadSource,
}

struct StoreState {
    document: PortfolioDocument,
    is_loading: bool,
    /// Revision of the last applied remote snapshot.
    revision: u64,
}

struct Shared {
    state: Mutex<StoreState>,
    listeners: Mutex<BTreeMap<u64, StoreListener>>,
    next_listener_id: AtomicU64,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, BTreeMap<u64, StoreListener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, document: PortfolioDocument) {
        {
            let mut state = self.state();
            state.document = document.clone();
            state.is_loading = false;
        }
        self.notify(&document);
    }

    /// Installs a remote snapshot unless a newer one was already applied.
    fn apply_snapshot(&self, revision: u64, document: PortfolioDocument) {
        {
            let mut state = self.state();
            if revision <= state.revision {
                debug!(
                    "event=store_snapshot module=store status=ignored reason=stale revision={revision} current={}",
                    state.revision
                );
                return;
            }
            state.revision = revision;
            state.document = document;
            state.is_loading = false;
        }
        // Late deliveries still report the newest document.
        let current = self.state().document.clone();
        self.notify(&current);
    }

    fn notify(&self, document: &PortfolioDocument) {
        let listeners: Vec<StoreListener> = self.listeners().values().cloned().collect();
        for listener in listeners {
            listener(document);
        }
    }
}

/// Store listener registration; unregisters on drop.
pub struct StoreSubscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.listeners().remove(&self.id);
        }
    }
}

/// Owner of the authoritative portfolio document.
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    shared: Arc<Shared>,
    live_updates: Mutex<Option<BackendSubscription>>,
    /// Set when the last load could not read a local slot.
    slot_unreadable: AtomicBool,
}

impl DocumentStore {
    /// Creates a store over `backend`, holding the defaults until `load`.
    ///
    /// Remote stores report `is_loading() == true` until the first load.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        let is_loading = backend.kind() == BackendKind::Remote;
        Self {
            backend,
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState {
                    document: default_document(),
                    is_loading,
                    revision: 0,
                }),
                listeners: Mutex::new(BTreeMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
            live_updates: Mutex::new(None),
            slot_unreadable: AtomicBool::new(false),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Reads the persisted document and installs the reconciled result.
    ///
    /// # Contract
    /// - Absent document: defaults, which are also written to the backend.
    /// - Present document: defaults deep-merged onto it.
    /// - Read/decode failure: defaults; the failure is only logged. A local
    ///   slot in this state is left untouched by later updates.
    /// - Remote backends start delivering live changes afterwards.
    pub fn load(&self) -> LoadOutcome {
        let started_at = Instant::now();
        let kind = self.backend.kind().as_str();
        info!("event=store_load module=store status=start backend={kind}");

        let (document, source) = match self.backend.read() {
            Ok(Some(persisted)) => match decode_with_defaults(persisted) {
                Ok(document) => (document, LoadSource::Persisted),
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=fallback backend={kind} reason=decode_failed error={err}"
                    );
                    (default_document(), LoadSource::Fallback)
                }
            },
            Ok(None) => {
                let document = default_document();
                self.seed(&document);
                (document, LoadSource::Defaults)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=fallback backend={kind} reason=read_failed error={err}"
                );
                (default_document(), LoadSource::Fallback)
            }
        };

        let unreadable_slot =
            source == LoadSource::Fallback && self.backend.kind() == BackendKind::Local;
        self.slot_unreadable.store(unreadable_slot, Ordering::SeqCst);

        if let Err(err) = document.validate() {
            warn!("event=store_validate module=store status=warn backend={kind} error={err}");
        }

        self.shared.replace(document.clone());
        if self.backend.kind() == BackendKind::Remote {
            self.attach_live_updates();
        }

        info!(
            "event=store_load module=store status=ok backend={kind} source={} duration_ms={}",
            source.as_str(),
            started_at.elapsed().as_millis()
        );
        LoadOutcome {
            document,
            is_loading: false,
            source,
        }
    }

    /// Returns a snapshot of the current document.
    pub fn document(&self) -> PortfolioDocument {
        self.shared.state().document.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state().is_loading
    }

    /// Shallow-merges `partial` and persists the change.
    ///
    /// Local backends receive the full document; remote backends receive only
    /// the sections present in `partial`, so concurrent writers of other
    /// sections are not clobbered.
    pub fn update_data(&self, partial: PartialPortfolioDocument) {
        if partial.is_empty() {
            return;
        }
        let keys = partial.keys().join(",");
        let remote = self.backend.kind() == BackendKind::Remote;
        let partial_fields = if remote {
            Some(partial.to_fields())
        } else {
            None
        };

        let document = {
            let mut state = self.shared.state();
            apply_partial(&mut state.document, partial);
            state.document.clone()
        };
        self.shared.notify(&document);

        if self.slot_unreadable.load(Ordering::SeqCst) {
            warn!(
                "event=store_persist module=store status=skipped keys={keys} reason=unreadable_slot"
            );
            return;
        }

        let write = match partial_fields {
            Some(fields) => fields.map(DocumentWrite::merge),
            None => document.to_fields().map(DocumentWrite::replace),
        };
        let result = match write {
            Ok(write) => self.backend.write(write),
            Err(err) => Err(BackendError::from(err)),
        };
        match result {
            Ok(()) => debug!("event=store_persist module=store status=ok keys={keys}"),
            Err(err) => error!(
                "event=store_persist module=store status=error keys={keys} error={err}"
            ),
        }
    }

    /// Registers a listener called after every document change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&PortfolioDocument) + Send + Sync + 'static,
    ) -> StoreSubscription {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners().insert(id, Arc::new(listener));
        StoreSubscription {
            shared: Arc::downgrade(&self.shared),
            id,
        }
    }

    /// Whether remote change delivery is currently attached.
    pub fn is_following_changes(&self) -> bool {
        self.live_updates().is_some()
    }

    /// Releases the backend change subscription.
    pub fn close(&self) {
        let subscription = self.live_updates().take();
        if let Some(subscription) = subscription {
            subscription.release();
            debug!("event=store_close module=store status=ok");
        }
    }

    fn seed(&self, document: &PortfolioDocument) {
        let result = document
            .to_fields()
            .map_err(BackendError::from)
            .and_then(|fields| self.backend.write(DocumentWrite::replace(fields)));
        if let Err(err) = result {
            error!("event=store_seed module=store status=error error={err}");
        }
    }

    fn attach_live_updates(&self) {
        if self.is_following_changes() {
            return;
        }
        let shared = Arc::downgrade(&self.shared);
        let listener: ChangeListener = Arc::new(move |snapshot: DocumentSnapshot| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            match decode_with_defaults(snapshot.document) {
                Ok(document) => shared.apply_snapshot(snapshot.revision, document),
                Err(err) => warn!(
                    "event=store_snapshot module=store status=ignored reason=decode_failed error={err}"
                ),
            }
        });

        match self.backend.subscribe(listener) {
            Ok(subscription) => *self.live_updates() = Some(subscription),
            Err(err) => error!("event=store_subscribe module=store status=error error={err}"),
        }
    }

    fn live_updates(&self) -> MutexGuard<'_, Option<BackendSubscription>> {
        self.live_updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DocumentStore {
    fn drop(&mut self) {
        self.close();
    }
}

/// Decodes a persisted tree after overlaying the compiled-in defaults.
fn decode_with_defaults(persisted: Value) -> serde_json::Result<PortfolioDocument> {
    serde_json::from_value(overlay_defaults(persisted, &default_document_value()))
}
