//! SQLite-backed document service.
//!
//! Stores documents in the `documents` table so several processes can share
//! one database file. Change delivery covers writers inside this process.

use crate::backend::service::{decode_document, DocumentPath, DocumentService, WatchId, WatchRegistry};
use crate::backend::{BackendResult, ChangeListener, DocumentSnapshot};
use crate::db::{open_db, open_db_in_memory};
use crate::merge::merge_top_level;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Document service persisted in a SQLite database.
pub struct SqliteDocumentService {
    conn: Mutex<Connection>,
    watchers: WatchRegistry,
    revision: AtomicU64,
}

impl SqliteDocumentService {
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        Ok(Self::with_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> BackendResult<Self> {
        Ok(Self::with_connection(open_db_in_memory()?))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            watchers: WatchRegistry::new(),
            revision: AtomicU64::new(0),
        }
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_fields(conn: &Connection, path: &DocumentPath) -> BackendResult<Option<Map<String, Value>>> {
    let raw = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND document_id = ?2;",
            params![path.collection, path.document],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    raw.as_deref().map(decode_document).transpose()
}

impl DocumentService for SqliteDocumentService {
    fn get(&self, path: &DocumentPath) -> BackendResult<Option<Value>> {
        let conn = self.connection();
        Ok(load_fields(&conn, path)?.map(Value::Object))
    }

    fn set(
        &self,
        path: &DocumentPath,
        fields: Map<String, Value>,
        merge: bool,
    ) -> BackendResult<()> {
        let snapshot = {
            let mut conn = self.connection();
            let tx = conn.transaction()?;
            let stored = if merge {
                let mut stored = load_fields(&tx, path)?.unwrap_or_default();
                merge_top_level(&mut stored, fields);
                stored
            } else {
                fields
            };
            let snapshot = Value::Object(stored);
            tx.execute(
                "INSERT INTO documents (collection, document_id, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, document_id) DO UPDATE SET
                    body = excluded.body,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![path.collection, path.document, serde_json::to_string(&snapshot)?],
            )?;
            tx.commit()?;
            DocumentSnapshot {
                revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
                document: snapshot,
            }
        };
        self.watchers.notify(path, &snapshot);
        Ok(())
    }

    fn watch(&self, path: &DocumentPath, listener: ChangeListener) -> BackendResult<WatchId> {
        Ok(self.watchers.add(path, listener))
    }

    fn unwatch(&self, path: &DocumentPath, id: WatchId) {
        self.watchers.remove(path, id);
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteDocumentService;
    use crate::backend::service::{DocumentPath, DocumentService};
    use serde_json::json;

    #[test]
    fn merge_writes_accumulate_top_level_keys() {
        let service = SqliteDocumentService::open_in_memory().expect("open");
        let path = DocumentPath::default();
        assert!(service.get(&path).expect("get").is_none());

        let first = json!({"skills": []}).as_object().cloned().expect("object");
        let second = json!({"projects": []}).as_object().cloned().expect("object");
        service.set(&path, first, true).expect("first");
        service.set(&path, second, true).expect("second");

        assert_eq!(
            service.get(&path).expect("get"),
            Some(json!({"skills": [], "projects": []}))
        );
    }

    #[test]
    fn documents_are_isolated_by_path() {
        let service = SqliteDocumentService::open_in_memory().expect("open");
        let fields = json!({"a": 1}).as_object().cloned().expect("object");
        service
            .set(&DocumentPath::new("portfolio", "draft"), fields, false)
            .expect("set");
        assert!(service
            .get(&DocumentPath::default())
            .expect("get")
            .is_none());
    }
}
