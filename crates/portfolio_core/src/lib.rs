//! Core domain logic for the portfolio site.
//! This crate owns the portfolio document, its persistence, and its edits.

pub mod backend;
pub mod config;
pub mod db;
pub mod defaults;
pub mod logging;
pub mod merge;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

pub use backend::{
    BackendError, BackendKind, BackendResult, DocumentBackend, DocumentPath, DocumentService,
    InMemoryDocumentService, RemoteDocumentBackend, SqliteDocumentService, SqliteSlotBackend,
};
pub use config::{BackendConfig, ConfigError, PortfolioConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{PartialPortfolioDocument, PortfolioDocument};
pub use model::personal_info::PersonalInfo;
pub use model::project::Project;
pub use model::skill::{Skill, SkillCategory};
pub use model::timeline::{EducationItem, ExperienceItem};
pub use model::validation::DocumentValidationError;
pub use model::EntryId;
pub use service::editor::PortfolioEditor;
pub use service::{EditError, EditResult};
pub use store::{DocumentStore, LoadOutcome, LoadSource, StoreSubscription};
pub use view::{filter_projects, paragraphs, project_tags, ProjectFilter};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
