//! Integration tests for FamilyTreeService over a JSON file store
//!
//! Tests cover:
//! - First open falling back to the sample family
//! - Mutations persisting across reopen
//! - JSON and CSV export/import through the service

use anyhow::Result;
use chrono::NaiveDate;
use familytree_core::db::{JsonFileStore, RecordStore};
use familytree_core::models::{PersonDraft, PersonId, PersonPatch};
use familytree_core::operations::Relation;
use familytree_core::services::{FamilyServiceError, ViewFilter, ViewSelection};
use familytree_core::{EngineConfig, FamilyTreeService};
use std::sync::Arc;
use tempfile::TempDir;

/// Test helper: service over a fresh file in a temp directory
async fn create_test_env() -> Result<(Arc<JsonFileStore>, FamilyTreeService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = Arc::new(JsonFileStore::new(temp_dir.path().join("family").join("records.json")));
    let service = FamilyTreeService::open(store.clone(), EngineConfig::default()).await?;

    Ok((store, service, temp_dir))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[tokio::test]
async fn test_first_open_uses_sample_without_writing() -> Result<()> {
    let (store, service, _temp_dir) = create_test_env().await?;

    assert_eq!(service.records().len(), 7);
    assert!(!store.path().exists());
    Ok(())
}

#[tokio::test]
async fn test_mutations_survive_reopen() -> Result<()> {
    let (store, mut service, _temp_dir) = create_test_env().await?;

    let baby = service
        .add_relative(Relation::Child, PersonId(5), PersonDraft::new("Baby"))
        .await?;
    service
        .update(baby, &PersonPatch::new().with_birth_date(Some("2023-04-02".into())))
        .await?;
    service.move_person(PersonId(6), PersonId(4)).await?;

    let reopened = FamilyTreeService::open(store.clone(), EngineConfig::default()).await?;
    assert_eq!(reopened.records(), service.records());

    let report = reopened.derive(
        &reopened
            .request(today())
            .with_selection(ViewSelection::selected(PersonId(4)).with_filter(ViewFilter::Descendants)),
    );
    assert_eq!(report.roots, vec![PersonId(4)]);
    assert_eq!(report.descendant_counts.get(PersonId(4)), 1);
    assert_eq!(report.descendant_counts.get(PersonId(3)), 2);
    Ok(())
}

#[tokio::test]
async fn test_rejected_move_does_not_touch_file() -> Result<()> {
    let (store, mut service, _temp_dir) = create_test_env().await?;
    service.reset().await?;
    let before = store.load().await?;

    let err = service.move_person(PersonId(3), PersonId(5)).await.unwrap_err();

    assert!(matches!(err, FamilyServiceError::Rejected(_)));
    assert_eq!(store.load().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_export_import_round_trip() -> Result<()> {
    let (_store, mut service, _temp_dir) = create_test_env().await?;
    service
        .add(PersonDraft::new("Quoted \"Nick\"").with_parent(PersonId(4)))
        .await?;

    let json = service.export_json()?;
    let csv = service.export_csv();
    let original = service.records().to_vec();

    service.reset().await?;
    assert_eq!(service.import_json(&json).await?, 8);
    assert_eq!(service.records(), original.as_slice());

    // CSV reads empty cells as absent, so blank notes do not survive
    service.reset().await?;
    assert_eq!(service.import_csv(&csv).await?, 8);
    for (imported, expected) in service.records().iter().zip(&original) {
        assert_eq!(imported.id, expected.id);
        assert_eq!(imported.name, expected.name);
        assert_eq!(imported.parent_id, expected.parent_id);
        assert_eq!(imported.partner_id, expected.partner_id);
        assert_eq!(imported.birth_date, expected.birth_date);
        assert_eq!(imported.gender, expected.gender);
    }
    assert_eq!(service.records()[6].notes.as_deref(), Some("Mom"));
    assert_eq!(service.records()[2].notes, None);
    Ok(())
}

#[tokio::test]
async fn test_import_rejects_non_array() -> Result<()> {
    let (_store, mut service, _temp_dir) = create_test_env().await?;

    let err = service.import_json(r#"{"id": 1}"#).await.unwrap_err();

    assert!(matches!(err, FamilyServiceError::Format(_)));
    assert_eq!(service.records().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_deleted_ids_not_reused_by_next_session() -> Result<()> {
    let (store, mut service, _temp_dir) = create_test_env().await?;
    let newest = service.add(PersonDraft::new("Newest")).await?;
    service.delete(newest).await?;
    drop(service);

    let mut reopened = FamilyTreeService::open(store, EngineConfig::default()).await?;
    assert!(reopened.records().iter().all(|r| r.id != newest));

    let next = reopened.add(PersonDraft::new("Next")).await?;
    assert!(next > newest);
    Ok(())
}

#[tokio::test]
async fn test_import_with_parent_cycle_keeps_file() -> Result<()> {
    let (store, mut service, _temp_dir) = create_test_env().await?;
    service.reset().await?;
    let before = store.load().await?;

    let err = service
        .import_json(r#"[{"id": 1, "name": "A", "parentId": 3}, {"id": 2, "name": "B", "parentId": 1}, {"id": 3, "name": "C", "parentId": 2}]"#)
        .await
        .unwrap_err();

    assert!(matches!(err, FamilyServiceError::ParentCycle { .. }));
    assert_eq!(store.load().await?, before);
    assert_eq!(service.records().len(), 7);
    Ok(())
}
