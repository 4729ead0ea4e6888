#![cfg(feature = "sqlite")]

use service_estimator::{
    EstimateInput, EstimateStore, Frequency, HousekeepingEstimate, PersistenceError,
    ProjectStatus, RecurringTask, ResourceBucket, SqliteEstimateStore, StoredProject, VariantKind,
};
use tempfile::NamedTempFile;

fn sample_project(id: &str) -> StoredProject {
    let mut estimate = HousekeepingEstimate::default();
    estimate.metadata.project_name = format!("Project {id}");
    estimate.tasks.push(RecurringTask::new(
        "office",
        1000.0,
        Frequency::Daily,
        ResourceBucket::ManualGeneral,
    ));
    StoredProject::new(id, EstimateInput::from(estimate))
}

#[test]
fn sqlite_round_trip_preserves_input_and_result() {
    let tmp = NamedTempFile::new().expect("temp file");
    let store = SqliteEstimateStore::new(tmp.path()).expect("open store");

    let mut project = sample_project("hk-001");
    project.recompute().expect("estimate runs");
    store.save_project(&project).expect("save");

    let loaded = store
        .load_project("hk-001")
        .expect("load")
        .expect("project exists");
    assert_eq!(loaded, project);

    // A fresh connection sees the same data.
    drop(store);
    let reopened = SqliteEstimateStore::new(tmp.path()).expect("reopen store");
    let again = reopened.load_project("hk-001").unwrap().unwrap();
    assert_eq!(again.result, project.result);
}

#[test]
fn saving_twice_replaces_the_row() {
    let store = SqliteEstimateStore::in_memory().expect("open store");
    let mut project = sample_project("hk-002");
    store.save_project(&project).unwrap();

    project.input.metadata_mut().project_name = "Renamed".into();
    store.save_project(&project).unwrap();

    let summaries = store.list_projects().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].project_name, "Renamed");
    assert_eq!(summaries[0].variant, VariantKind::Housekeeping);
    assert_eq!(summaries[0].selling_annual, None);
}

#[test]
fn list_and_delete_projects() {
    let store = SqliteEstimateStore::in_memory().expect("open store");
    for id in ["b", "a", "c"] {
        store.save_project(&sample_project(id)).unwrap();
    }

    let ids: Vec<String> = store
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    assert!(store.delete_project("b").unwrap());
    assert!(!store.delete_project("b").unwrap());
    assert!(store.load_project("b").unwrap().is_none());
}

#[test]
fn status_updates_follow_the_lifecycle() {
    let store = SqliteEstimateStore::in_memory().expect("open store");
    store.save_project(&sample_project("bid")).unwrap();

    let submitted = store.update_status("bid", ProjectStatus::Submitted).unwrap();
    assert_eq!(submitted.status(), ProjectStatus::Submitted);
    store.update_status("bid", ProjectStatus::Approved).unwrap();
    store.update_status("bid", ProjectStatus::Awarded).unwrap();

    let err = store
        .update_status("bid", ProjectStatus::Draft)
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::InvalidTransition {
            from: ProjectStatus::Awarded,
            to: ProjectStatus::Draft
        }
    ));

    let stored = store.load_project("bid").unwrap().unwrap();
    assert_eq!(stored.status(), ProjectStatus::Awarded);
}

#[test]
fn status_update_for_missing_project_fails() {
    let store = SqliteEstimateStore::in_memory().expect("open store");
    assert!(matches!(
        store.update_status("nope", ProjectStatus::Submitted),
        Err(PersistenceError::NotFound(_))
    ));
}
