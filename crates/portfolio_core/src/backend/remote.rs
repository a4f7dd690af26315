//! Remote document backend.
//!
//! Adapts a `DocumentService` to the store's backend contract for one fixed
//! document path.

use crate::backend::service::{DocumentPath, DocumentService};
use crate::backend::{
    BackendKind, BackendResult, BackendSubscription, ChangeListener, DocumentBackend,
    DocumentWrite, WriteMode,
};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Backend bound to one document of a shared document service.
pub struct RemoteDocumentBackend {
    service: Arc<dyn DocumentService>,
    path: DocumentPath,
}

impl RemoteDocumentBackend {
    pub fn new(service: Arc<dyn DocumentService>, path: DocumentPath) -> Self {
        Self { service, path }
    }

    pub fn path(&self) -> &DocumentPath {
        &self.path
    }
}

impl DocumentBackend for RemoteDocumentBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn read(&self) -> BackendResult<Option<Value>> {
        self.service.get(&self.path)
    }

    fn write(&self, write: DocumentWrite) -> BackendResult<()> {
        let merge = write.mode == WriteMode::Merge;
        debug!(
            "event=remote_write module=backend status=start path={} merge={} keys={}",
            self.path,
            merge,
            write.fields.len()
        );
        self.service.set(&self.path, write.fields, merge)
    }

    fn subscribe(&self, listener: ChangeListener) -> BackendResult<BackendSubscription> {
        let watch_id = self.service.watch(&self.path, listener)?;
        let service = Arc::clone(&self.service);
        let path = self.path.clone();
        Ok(BackendSubscription::new(move || {
            service.unwatch(&path, watch_id);
            debug!("event=remote_unwatch module=backend status=ok path={path}");
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteDocumentBackend;
    use crate::backend::service::{DocumentPath, InMemoryDocumentService};
    use crate::backend::{BackendKind, DocumentBackend, DocumentSnapshot, DocumentWrite};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn dropping_subscription_unwatches_the_document() {
        let service = Arc::new(InMemoryDocumentService::new());
        let backend = RemoteDocumentBackend::new(service.clone(), DocumentPath::default());
        assert_eq!(backend.kind(), BackendKind::Remote);

        let subscription = backend
            .subscribe(Arc::new(|_: DocumentSnapshot| {}))
            .expect("subscribe");
        assert_eq!(service.watcher_count(backend.path()), 1);
        drop(subscription);
        assert_eq!(service.watcher_count(backend.path()), 0);
    }

    #[test]
    fn merge_write_goes_to_bound_path() {
        let service = Arc::new(InMemoryDocumentService::new());
        let path = DocumentPath::new("portfolio", "preview");
        let backend = RemoteDocumentBackend::new(service, path);
        let fields = json!({"projects": []}).as_object().cloned().expect("object");
        backend.write(DocumentWrite::merge(fields)).expect("write");
        assert_eq!(backend.read().expect("read"), Some(json!({"projects": []})));
    }
}
