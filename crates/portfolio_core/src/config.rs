//! Portfolio configuration file.
//!
//! # Responsibility
//! - Describe which backend holds the document and where logs go.
//! - Build the configured backend.
//!
//! # Invariants
//! - A missing config file yields the defaults; a malformed one is an error.

use crate::backend::service::{DEFAULT_COLLECTION, DEFAULT_DOCUMENT};
use crate::backend::{
    BackendResult, DocumentBackend, DocumentPath, RemoteDocumentBackend, SqliteDocumentService,
    SqliteSlotBackend, DEFAULT_SLOT_KEY,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_CONFIG_NAME: &str = "portfolio.config.json";
pub const DEFAULT_DB_PATH: &str = "portfolio.sqlite3";

/// Failure reading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Portfolio configuration file format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioConfig {
    /// Where the document lives
    #[serde(default)]
    pub backend: BackendConfig,

    /// Log level; the build-mode default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Absolute log directory; file logging is off when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Single-slot SQLite storage on this machine
    Local {
        #[serde(rename = "dbPath", default = "default_db_path")]
        db_path: String,
        #[serde(rename = "slotKey", default = "default_slot_key")]
        slot_key: String,
    },
    /// Shared document store, backed by a SQLite documents table
    Remote {
        #[serde(rename = "dbPath", default = "default_db_path")]
        db_path: String,
        #[serde(default = "default_collection")]
        collection: String,
        #[serde(default = "default_document")]
        document: String,
    },
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_document() -> String {
    DEFAULT_DOCUMENT.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Local {
            db_path: default_db_path(),
            slot_key: default_slot_key(),
        }
    }
}

impl PortfolioConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_file(dir.as_ref().join(DEFAULT_CONFIG_NAME))
    }

    /// Load config from an explicit file path
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Opens the configured backend, resolving relative db paths against `base`.
    pub fn open_backend(&self, base: impl AsRef<Path>) -> BackendResult<Arc<dyn DocumentBackend>> {
        let backend: Arc<dyn DocumentBackend> = match &self.backend {
            BackendConfig::Local { db_path, slot_key } => Arc::new(SqliteSlotBackend::open(
                base.as_ref().join(db_path),
                slot_key.clone(),
            )?),
            BackendConfig::Remote {
                db_path,
                collection,
                document,
            } => {
                let service = SqliteDocumentService::open(base.as_ref().join(db_path))?;
                Arc::new(RemoteDocumentBackend::new(
                    Arc::new(service),
                    DocumentPath::new(collection.clone(), document.clone()),
                ))
            }
        };
        Ok(backend)
    }
}
