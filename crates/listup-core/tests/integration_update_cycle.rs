//! Integration test: stage a list on disk, run update cycles, and keep the
//! record database in step, the way the CLI adapter does.

mod common;

use listup_core::compiler::{BasicRuleCompiler, CompiledRuleset};
use listup_core::records::{RecordDb, UpdateRecord};
use listup_core::store::{staged_key, ByteStore, FsByteStore};
use listup_core::{Decision, PipelineError, TaskOutcome, UpdatePipeline, UpdateTask};
use tempfile::tempdir;

async fn run_cycle(
    pipeline: &UpdatePipeline<FsByteStore, BasicRuleCompiler>,
    db: &RecordDb,
    id: &str,
) -> Decision {
    let stored = db.get_record(id).await.unwrap();
    let task = UpdateTask::new(id).external_checksum(stored.map(|r| r.last_checksum));
    let decision = pipeline.run_update_cycle(&task);
    if let Some(record) = UpdateRecord::from_decision(id, &decision) {
        db.upsert_record(&record).await.unwrap();
    }
    decision
}

#[tokio::test]
async fn install_skip_and_update() {
    let state = tempdir().unwrap();
    let store = FsByteStore::open(state.path().join("store")).unwrap();
    let db = RecordDb::open_at(state.path().join("records.db")).await.unwrap();
    let pipeline = UpdatePipeline::new(store, BasicRuleCompiler);
    let key = staged_key("easylist");

    // First install.
    pipeline
        .store()
        .save_data(&key, common::lists::easylist_v1().as_bytes())
        .unwrap();
    let first = run_cycle(&pipeline, &db, "easylist").await;
    let outcome = TaskOutcome::from(&first);
    assert!(matches!(
        outcome,
        TaskOutcome::Success {
            filters_count: Some(3),
            already_up_to_date: false,
            ..
        }
    ));
    assert!(pipeline.store().load_data(&key).unwrap().is_empty());

    let artifact = pipeline.store().load_data("easylist").unwrap();
    let rules = CompiledRuleset::from_bytes(&artifact).unwrap();
    assert_eq!(rules.blocking, vec!["||ads.example^"]);
    assert_eq!(rules.exceptions, vec!["||ads.example/allowed.js"]);

    let record = db.get_record("easylist").await.unwrap().unwrap();
    assert_eq!(record.title.as_deref(), Some("EasyList Sample"));
    assert_eq!(record.homepage.as_deref(), Some("https://easylist.example"));
    assert_eq!(record.filters_count, 3);

    // Same content again: nothing to do, staged download left alone.
    pipeline
        .store()
        .save_data(&key, common::lists::easylist_v1().as_bytes())
        .unwrap();
    let second = run_cycle(&pipeline, &db, "easylist").await;
    assert!(matches!(second, Decision::AlreadyUpToDate { .. }));
    assert_eq!(second.title(), Some("EasyList Sample"));

    // New content replaces the artifact and the record.
    pipeline
        .store()
        .save_data(&key, common::lists::easylist_v2().as_bytes())
        .unwrap();
    let third = run_cycle(&pipeline, &db, "easylist").await;
    assert!(matches!(third, Decision::Updated { filters_count: 4, .. }));

    let record = db.get_record("easylist").await.unwrap().unwrap();
    assert_eq!(record.filters_count, 4);
    assert!(record.homepage.is_none());
    assert_ne!(record.last_checksum, "");
}

#[tokio::test]
async fn tampered_update_keeps_installed_artifact() {
    let state = tempdir().unwrap();
    let store = FsByteStore::open(state.path().join("store")).unwrap();
    let db = RecordDb::open_at(state.path().join("records.db")).await.unwrap();
    let pipeline = UpdatePipeline::new(store, BasicRuleCompiler);
    let key = staged_key("easylist");

    pipeline
        .store()
        .save_data(&key, common::lists::easylist_v1().as_bytes())
        .unwrap();
    run_cycle(&pipeline, &db, "easylist").await;
    let installed = pipeline.store().load_data("easylist").unwrap();
    let before = db.get_record("easylist").await.unwrap().unwrap();

    let tampered = common::lists::easylist_v2() + "||evil.example^\n";
    pipeline.store().save_data(&key, tampered.as_bytes()).unwrap();
    let decision = run_cycle(&pipeline, &db, "easylist").await;

    assert!(matches!(
        decision,
        Decision::Failed(PipelineError::IntegrityFailure { .. })
    ));
    assert_eq!(pipeline.store().load_data("easylist").unwrap(), installed);
    assert_eq!(pipeline.store().load_data(&key).unwrap(), tampered.as_bytes());
    let after = db.get_record("easylist").await.unwrap().unwrap();
    assert_eq!(after.last_checksum, before.last_checksum);
}
