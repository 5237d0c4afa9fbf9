use std::sync::Arc;

use savesync::{Dashboard, Error};
use savesync::api::ApiErrorKind;
use savesync::api::sources::{CreateSource, UpdateSource};
use savesync::api::targets::{CreateTarget, UpdateTarget, TargetConfig, LocalConfig};
use savesync::cache::{CacheKey, Collection, Dirty};
use savesync::session::MemoryTokenStore;
use serde_json::json;

mod common;

use common::{Server, ADMIN_EMAIL, ADMIN_PASSWORD, MANIFEST};

async fn logged_in(server: &Server) -> Dashboard {
    let dashboard = server.dashboard(Arc::new(MemoryTokenStore::new()));

    dashboard.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    dashboard
}

fn local(path: &str) -> TargetConfig {
    TargetConfig::Local(LocalConfig {
        path: path.to_owned(),
    })
}

#[tokio::test]
async fn concurrent_reads_share_one_request() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_source("docs", None);

    let sources = dashboard.sources();
    let (a, b) = tokio::join!(sources.get(id), sources.get(id));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(server.backend.hits("GET sources/:id"), 1);

    sources.get(id).await.unwrap();

    assert_eq!(server.backend.hits("GET sources/:id"), 1);
}

#[tokio::test]
async fn get_after_update_reflects_update() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_source("docs", None);
    let sources = dashboard.sources();

    let before = sources.get(id).await.unwrap().unwrap();
    let mut body = UpdateSource::from(&before);
    body.name = String::from("documents");

    sources.update(id, body).await.unwrap();

    let after = sources.get(id).await.unwrap().unwrap();

    assert_eq!(after.name, "documents");
    assert_eq!(server.backend.hits("GET sources/:id"), 2);
}

#[tokio::test]
async fn delete_then_list_excludes_id() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let keep = server.backend.insert_source("docs", None);
    let removed = server.backend.insert_source("music", None);
    let sources = dashboard.sources();

    assert_eq!(sources.list().await.unwrap().len(), 2);

    sources.delete(removed).await.unwrap();

    let listed = sources.list().await.unwrap();

    assert!(listed.iter().all(|s| s.id != removed));
    assert!(listed.iter().any(|s| s.id == keep));
}

#[tokio::test]
async fn create_refreshes_list() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let sources = dashboard.sources();

    assert!(sources.list().await.unwrap().is_empty());

    let created = sources.create(CreateSource {
        name: String::from("photos"),
        path: String::from("/srv/photos"),
        exclusions: vec![String::from("*.tmp")],
        target_id: None,
        schedule_id: None,
    }).await.unwrap();

    let listed = sources.list().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].exclusions, vec![String::from("*.tmp")]);
}

#[tokio::test]
async fn invalid_create_is_rejected_locally() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;

    let result = dashboard.sources().create(CreateSource {
        name: String::new(),
        path: String::from("/srv/photos"),
        exclusions: Vec::new(),
        target_id: None,
        schedule_id: None,
    }).await;

    match result {
        Err(Error::Validation(errors)) => assert!(errors.contains("name")),
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(server.backend.hits("POST sources"), 0);
}

#[tokio::test]
async fn run_invalidates_jobs_and_snapshots() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_source("docs", None);

    dashboard.sources().list().await.unwrap();
    assert!(dashboard.jobs().list().await.unwrap().is_empty());
    assert!(dashboard.snapshots().list().await.unwrap().is_empty());

    let started = dashboard.sources().run(id).await.unwrap();

    let jobs = dashboard.jobs().list().await.unwrap();
    let snapshots = dashboard.snapshots().list().await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, started.job_id);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(dashboard.jobs().active().await.unwrap().len(), 1);

    assert_eq!(server.backend.hits("GET jobs"), 2);
    assert_eq!(server.backend.hits("GET snapshots"), 2);
    assert!(dashboard.cache().is_fresh(&CacheKey::list(Collection::Sources)));
    assert_eq!(server.backend.hits("GET sources"), 1);
}

#[tokio::test]
async fn restore_invalidates_jobs() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let source_id = server.backend.insert_source("docs", None);
    let snapshot_id = server.backend.insert_snapshot(source_id);

    assert!(dashboard.jobs().list().await.unwrap().is_empty());

    dashboard.snapshots().restore(snapshot_id).await.unwrap();

    assert_eq!(dashboard.jobs().list().await.unwrap().len(), 1);
    assert_eq!(server.backend.hits("GET jobs"), 2);
}

#[tokio::test]
async fn failed_mutation_keeps_cache() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_source("docs", None);
    server.backend.insert_source("music", None);
    let sources = dashboard.sources();

    let current = sources.get(id).await.unwrap().unwrap();
    sources.list().await.unwrap();

    let mut body = UpdateSource::from(&current);
    body.name = String::from("music");

    let err = sources.update(id, body).await.unwrap_err();
    let api = err.api().expect("expected api error");

    assert_eq!(*api.kind(), ApiErrorKind::AlreadyExists);
    assert_eq!(api.message(), Some("a source with that name already exists"));

    assert!(dashboard.cache().is_fresh(&CacheKey::list(Collection::Sources)));
    assert!(dashboard.cache().is_fresh(&CacheKey::entry(Collection::Sources, id)));
    assert_eq!(sources.peek(id).map(|s| s.name), Some(String::from("docs")));
}

#[tokio::test]
async fn dangling_target_resolves_to_none() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_source("docs", Some(404));
    let sources = dashboard.sources();

    let source = sources.get(id).await.unwrap().unwrap();

    assert_eq!(source.target_id, Some(404));
    assert_eq!(sources.target_of(&source).await.unwrap(), None);
}

#[tokio::test]
async fn missing_entry_is_none() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;

    assert_eq!(dashboard.sources().get(999).await.unwrap(), None);
}

#[tokio::test]
async fn manifest_is_raw_bytes() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let source_id = server.backend.insert_source("docs", None);
    let snapshot_id = server.backend.insert_snapshot(source_id);

    let first = dashboard.snapshots().manifest(snapshot_id).await.unwrap();
    let second = dashboard.snapshots().manifest(snapshot_id).await.unwrap();

    assert_eq!(&first[..], MANIFEST);
    assert_eq!(first, second);
    assert_eq!(server.backend.hits("GET snapshots/:id/manifest"), 2);
}

#[tokio::test]
async fn non_json_error_falls_back_to_status() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;

    let err = dashboard.list_directory(None).await.unwrap_err();
    let api = err.api().expect("expected api error");

    assert_eq!(*api.kind(), ApiErrorKind::Unavailable);
    assert_eq!(api.message(), Some("Bad Gateway"));
    assert!(dashboard.session().is_authenticated());
}

#[tokio::test]
async fn cannot_remove_current_user() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let me = dashboard.session().user().unwrap().id;

    let deleted = dashboard.users().delete(me).await;
    let demoted = dashboard.users().set_admin(me, false).await;

    assert!(matches!(deleted, Err(Error::Validation(_))));
    assert!(matches!(demoted, Err(Error::Validation(_))));
    assert_eq!(server.backend.hits("DELETE users/:id"), 0);
}

#[tokio::test]
async fn delete_user_refreshes_list() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;

    let other = {
        let mut store = server.backend.store.lock().unwrap();
        store.users.insert(50, common::user(50, "ops@example.com", false));
        50
    };

    assert_eq!(dashboard.users().list().await.unwrap().len(), 2);

    dashboard.users().delete(other).await.unwrap();

    let users = dashboard.users().list().await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, ADMIN_EMAIL);
}

#[tokio::test]
async fn logout_clears_cache() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    server.backend.insert_source("docs", None);

    dashboard.sources().list().await.unwrap();
    assert!(!dashboard.cache().is_empty());

    dashboard.logout();

    assert!(dashboard.cache().is_empty());
    assert!(!dashboard.session().is_authenticated());
}

#[tokio::test]
async fn target_mutations_invalidate_list_and_entry() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let id = server.backend.insert_target("nas");
    let targets = dashboard.targets();
    let list_key = CacheKey::list(Collection::Targets);
    let entry_key = CacheKey::entry(Collection::Targets, id);

    assert_eq!(targets.list().await.unwrap().len(), 1);
    assert_eq!(targets.get(id).await.unwrap().unwrap().name, "nas");

    let created = targets.create(CreateTarget {
        name: String::from("garage"),
        config: local("/mnt/garage"),
    }).await.unwrap();

    assert_eq!(created.config, local("/mnt/garage"));
    assert!(!dashboard.cache().is_fresh(&list_key));
    assert!(dashboard.cache().is_fresh(&entry_key));
    assert_eq!(targets.list().await.unwrap().len(), 2);
    assert_eq!(server.backend.hits("GET targets"), 2);

    targets.update(id, UpdateTarget {
        name: String::from("nas-moved"),
        config: local("/mnt/nas2"),
    }).await.unwrap();

    assert!(!dashboard.cache().is_fresh(&list_key));
    assert!(!dashboard.cache().is_fresh(&entry_key));

    let updated = targets.get(id).await.unwrap().unwrap();

    assert_eq!(updated.name, "nas-moved");
    assert_eq!(updated.config, local("/mnt/nas2"));
    assert_eq!(server.backend.hits("GET targets/:id"), 2);

    targets.delete(created.id).await.unwrap();

    let listed = targets.list().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|t| t.id != created.id));
    assert_eq!(targets.get(created.id).await.unwrap(), None);
}

#[tokio::test]
async fn unresolvable_targets_are_left_out_of_list() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let keep = server.backend.insert_target("nas");

    server.backend.insert_target_record(json!({
        "name": "legacy",
        "type": "s3",
        "config": { "bucket": "old" },
    }));
    server.backend.insert_target_record(json!({
        "name": "unfinished",
        "type": "sftp",
        "config": null,
    }));

    let listed = dashboard.targets().list().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep);
}

#[tokio::test]
async fn file_tree_is_cached_per_snapshot() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let source = server.backend.insert_source("docs", None);
    let first = server.backend.insert_snapshot(source);
    let second = server.backend.insert_snapshot(source);
    let snapshots = dashboard.snapshots();

    let (a, b) = tokio::join!(snapshots.files(first), snapshots.files(first));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.name, format!("snapshot-{}", first));
    assert_eq!(a.total_size(), 1548);
    assert_eq!(server.backend.hits("GET snapshots/:id/files"), 1);

    let other = snapshots.files(second).await.unwrap();

    assert_eq!(other.name, format!("snapshot-{}", second));
    assert_eq!(server.backend.hits("GET snapshots/:id/files"), 2);

    dashboard.cache().invalidate(&Dirty::Entry(Collection::Snapshots, second));
    snapshots.restore(second).await.unwrap();

    assert!(dashboard.cache().is_fresh(&CacheKey::files(first)));

    let again = snapshots.files(first).await.unwrap();

    assert!(Arc::ptr_eq(&a, &again));
    assert_eq!(server.backend.hits("GET snapshots/:id/files"), 2);
}

#[tokio::test]
async fn settings_update_invalidates_settings() {
    let server = Server::start().await;
    let dashboard = logged_in(&server).await;
    let settings = dashboard.settings();

    assert!(!settings.registration_enabled().await.unwrap());
    assert!(!settings.registration_enabled().await.unwrap());
    assert_eq!(server.backend.hits("GET settings"), 1);

    settings.set_registration(true).await.unwrap();

    assert!(!dashboard.cache().is_fresh(&CacheKey::list(Collection::Settings)));
    assert!(settings.registration_enabled().await.unwrap());
    assert_eq!(server.backend.hits("GET settings"), 2);

    settings.update("retention_days", "30").await.unwrap();

    let current = settings.get().await.unwrap();

    assert_eq!(current.get("retention_days"), Some("30"));
    assert_eq!(server.backend.hits("GET settings"), 3);
}
