use portfolio_core::backend::{DocumentPath, DocumentService, InMemoryDocumentService};
use portfolio_core::defaults::default_document;
use portfolio_core::model::skill::{Skill, SkillCategory};
use portfolio_core::{
    DocumentStore, LoadSource, PartialPortfolioDocument, Project, RemoteDocumentBackend,
    SqliteDocumentService,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn client(service: &Arc<InMemoryDocumentService>) -> DocumentStore {
    let service: Arc<dyn DocumentService> = service.clone();
    DocumentStore::new(Arc::new(RemoteDocumentBackend::new(
        service,
        DocumentPath::default(),
    )))
}

fn project(id: &str) -> Project {
    Project::with_id(id, id, "desc", "https://example.com", vec![])
}

#[test]
fn second_client_loads_seeded_document() {
    let service = Arc::new(InMemoryDocumentService::new());
    let first = client(&service);
    assert!(first.is_loading());
    assert_eq!(first.load().source, LoadSource::Defaults);

    let second = client(&service);
    let outcome = second.load();
    assert_eq!(outcome.source, LoadSource::Persisted);
    assert_eq!(outcome.document, default_document());
    assert!(second.is_following_changes());
}

#[test]
fn disjoint_partial_writes_from_two_clients_both_survive() {
    let service = Arc::new(InMemoryDocumentService::new());
    let alice = client(&service);
    let bob = client(&service);
    alice.load();
    bob.load();

    alice.update_data(PartialPortfolioDocument::with_projects(vec![project("a1")]));
    let skills = vec![SkillCategory::new("Ops", vec![Skill::new("Docker", 70)])];
    bob.update_data(PartialPortfolioDocument::with_skills(skills.clone()));

    let stored = service.get(&DocumentPath::default()).unwrap().unwrap();
    assert_eq!(stored["projects"][0]["id"], "a1");
    assert_eq!(stored["skills"][0]["category"], "Ops");

    for store in [&alice, &bob] {
        let document = store.document();
        assert_eq!(document.projects, vec![project("a1")]);
        assert_eq!(document.skills, skills);
    }
}

#[test]
fn snapshots_reach_listeners_of_other_clients() {
    let service = Arc::new(InMemoryDocumentService::new());
    let writer = client(&service);
    let reader = client(&service);
    writer.load();
    reader.load();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = reader.subscribe(move |document| {
        if document.projects.iter().any(|p| p.id == "w1") {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    writer.update_data(PartialPortfolioDocument::with_projects(vec![project("w1")]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(reader.document().projects, vec![project("w1")]);
}

#[test]
fn editing_one_section_keeps_defaults_overlay_on_the_others() {
    let service = Arc::new(InMemoryDocumentService::new());
    let stale = json!({
        "personalInfo": { "name": "Stale Name", "tagline": "stale tagline" },
        "projects": []
    });
    service
        .set(
            &DocumentPath::default(),
            stale.as_object().cloned().unwrap(),
            false,
        )
        .unwrap();

    let store = client(&service);
    let loaded = store.load().document;
    let defaults = default_document();
    assert_eq!(loaded.personal_info, defaults.personal_info);
    assert_eq!(loaded.skills, defaults.skills);

    store.update_data(PartialPortfolioDocument::with_projects(vec![project("p1")]));

    let document = store.document();
    assert_eq!(document.projects, vec![project("p1")]);
    assert_eq!(document.personal_info, defaults.personal_info);
    assert_eq!(document.skills, defaults.skills);
    assert_eq!(document.experiences, defaults.experiences);
}

#[test]
fn dropping_store_releases_subscription() {
    let service = Arc::new(InMemoryDocumentService::new());
    let path = DocumentPath::default();
    let store = client(&service);
    store.load();
    assert_eq!(service.watcher_count(&path), 1);

    drop(store);
    assert_eq!(service.watcher_count(&path), 0);
}

#[test]
fn closed_store_stops_following_changes() {
    let service = Arc::new(InMemoryDocumentService::new());
    let store = client(&service);
    let other = client(&service);
    store.load();
    other.load();

    store.close();
    assert!(!store.is_following_changes());
    other.update_data(PartialPortfolioDocument::with_projects(vec![]));
    assert_eq!(store.document(), default_document());
}

#[test]
fn unreachable_service_falls_back_to_defaults() {
    let service = Arc::new(InMemoryDocumentService::new());
    service.set_online(false);
    let store = client(&service);

    let outcome = store.load();
    assert_eq!(outcome.source, LoadSource::Fallback);
    assert_eq!(outcome.document, default_document());
    assert!(!store.is_loading());
    assert!(!store.is_following_changes());

    store.update_data(PartialPortfolioDocument::with_projects(vec![]));
    assert!(store.document().projects.is_empty());
}

#[test]
fn sqlite_document_service_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shared.sqlite3");
    let path = DocumentPath::new("portfolio", "mainData");

    {
        let service: Arc<dyn DocumentService> =
            Arc::new(SqliteDocumentService::open(&db_path).unwrap());
        let store = DocumentStore::new(Arc::new(RemoteDocumentBackend::new(
            service,
            path.clone(),
        )));
        store.load();
        store.update_data(PartialPortfolioDocument::with_projects(vec![project("s1")]));
    }

    let service: Arc<dyn DocumentService> =
        Arc::new(SqliteDocumentService::open(&db_path).unwrap());
    let store = DocumentStore::new(Arc::new(RemoteDocumentBackend::new(service, path)));
    let outcome = store.load();
    assert_eq!(outcome.source, LoadSource::Persisted);
    assert_eq!(outcome.document.projects, vec![project("s1")]);
}
