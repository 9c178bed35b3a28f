use std::sync::Arc;

use attest_core::model::{
    AdminConfigDraft, Link, LinkId, SubmissionDraft, SubmissionField, SubmissionId, Training,
    TrainingId,
};
use attest_core::time::fixed_clock;
use services::{
    AdminConfigManager, CompletionTracker, SubmissionError, SubmissionPipeline, TrainingCatalog,
};
use storage::{DocumentStore, InMemoryBackend};

fn training() -> Training {
    Training::new(
        TrainingId::new("t1"),
        "Working at heights",
        vec![
            Link::new(LinkId::new("l1"), Some("Slides".into()), "https://example.com/slides")
                .unwrap(),
            Link::new(LinkId::new("l2"), None, "https://example.com/quiz").unwrap(),
        ],
        vec!["Acme".into()],
    )
    .unwrap()
}

fn draft() -> SubmissionDraft {
    SubmissionDraft {
        first_name: "Ana".into(),
        last_name: "García".into(),
        dni: "12345678Z".into(),
        company: "Construcción López".into(),
        signature: "data:image/png;base64,AAAA".into(),
        email: None,
        phone: None,
    }
}

async fn seeded_store(backend: &InMemoryBackend) -> DocumentStore {
    let store = DocumentStore::new(Arc::new(backend.clone()));
    TrainingCatalog::new(store.clone())
        .save(training())
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn completion_gated_submission_end_to_end() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let pipeline = SubmissionPipeline::new(store.clone(), fixed_clock());

    // The party studies every link before the form opens.
    let mut tracker = CompletionTracker::for_training(&training());
    tracker.mark_viewed(&LinkId::new("l1"));
    assert!(tracker.open_form().is_err());
    tracker.mark_viewed(&LinkId::new("l2"));
    tracker.open_form().unwrap();

    let submission = pipeline
        .submit(&TrainingId::new("t1"), draft())
        .await
        .unwrap();
    tracker.finish().unwrap();

    // Receipt carries the snapshot the party saw.
    assert_eq!(submission.training_name(), "Working at heights");
    assert_eq!(submission.dni(), "12345678Z");

    let document = store.fetch().await.unwrap();
    assert_eq!(document.submissions().len(), 1);
    assert_eq!(document.submissions()[0], submission);
    // The submitter's company joined the roster.
    assert!(
        document
            .companies()
            .iter()
            .any(|c| c == "Construcción López")
    );
}

#[tokio::test]
async fn validation_failure_performs_zero_store_calls() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let loads_before = backend.load_count();
    let stores_before = backend.store_count();

    let pipeline = SubmissionPipeline::new(store, fixed_clock());
    let bad_draft = SubmissionDraft {
        dni: String::new(),
        signature: "   ".into(),
        ..draft()
    };
    let err = pipeline
        .submit(&TrainingId::new("t1"), bad_draft)
        .await
        .unwrap_err();

    match err {
        SubmissionError::Validation(e) => {
            assert_eq!(
                e.missing,
                vec![SubmissionField::Dni, SubmissionField::Signature]
            );
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(backend.load_count(), loads_before);
    assert_eq!(backend.store_count(), stores_before);
}

#[tokio::test]
async fn submit_against_unknown_training_fails_without_writing() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let stores_before = backend.store_count();

    let pipeline = SubmissionPipeline::new(store, fixed_clock());
    let err = pipeline
        .submit(&TrainingId::new("missing"), draft())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::TrainingNotFound(_)));
    assert_eq!(backend.store_count(), stores_before);
}

#[tokio::test]
async fn snapshot_follows_training_renames() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let catalog = TrainingCatalog::new(store.clone());
    let pipeline = SubmissionPipeline::new(store.clone(), fixed_clock());

    let first = pipeline.submit(&TrainingId::new("t1"), draft()).await.unwrap();

    let renamed = Training::new(
        TrainingId::new("t1"),
        "Working at heights (2025 revision)",
        training().links().to_vec(),
        vec![],
    )
    .unwrap();
    catalog.save(renamed).await.unwrap();

    let second = pipeline.submit(&TrainingId::new("t1"), draft()).await.unwrap();

    // Each record keeps the name that was current when it was created.
    assert_eq!(first.training_name(), "Working at heights");
    assert_eq!(second.training_name(), "Working at heights (2025 revision)");
}

#[tokio::test]
async fn administrative_deletion_flows() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let pipeline = SubmissionPipeline::new(store.clone(), fixed_clock());

    let first = pipeline.submit(&TrainingId::new("t1"), draft()).await.unwrap();
    let _second = pipeline.submit(&TrainingId::new("t1"), draft()).await.unwrap();

    assert!(pipeline.delete_submission(first.id()).await.unwrap());
    assert!(!pipeline.delete_submission(first.id()).await.unwrap());
    assert!(
        !pipeline
            .delete_submission(&SubmissionId::new("never-existed"))
            .await
            .unwrap()
    );

    assert_eq!(pipeline.delete_all().await.unwrap(), 1);
    assert_eq!(pipeline.delete_all().await.unwrap(), 0);
    assert!(store.fetch().await.unwrap().submissions().is_empty());
}

#[tokio::test]
async fn admin_config_last_write_wins() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let manager = AdminConfigManager::new(store);

    manager
        .save(AdminConfigDraft {
            signature: Some("data:image/png;base64,BBBB".into()),
            clarification: Some("J. Pérez".into()),
            job_title: Some("Prevention officer".into()),
        })
        .await
        .unwrap();

    let replaced = manager
        .save(AdminConfigDraft {
            signature: None,
            clarification: Some("M. Ruiz".into()),
            job_title: None,
        })
        .await
        .unwrap();

    let loaded = manager.load().await.unwrap();
    assert_eq!(loaded, replaced);
    assert_eq!(loaded.clarification(), Some("M. Ruiz"));
    assert!(loaded.signature().is_none());
}

#[tokio::test]
async fn catalog_edit_and_delete() {
    let backend = InMemoryBackend::new();
    let store = seeded_store(&backend).await;
    let catalog = TrainingCatalog::new(store);

    assert_eq!(catalog.list().await.unwrap().len(), 1);
    assert!(catalog.get(&TrainingId::new("t1")).await.unwrap().is_some());

    assert!(catalog.delete(&TrainingId::new("t1")).await.unwrap());
    assert!(!catalog.delete(&TrainingId::new("t1")).await.unwrap());
    assert!(catalog.list().await.unwrap().is_empty());
}
