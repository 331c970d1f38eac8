//! `listup install` and `listup update-all` – run update cycles and record results.

use anyhow::{bail, Result};
use listup_core::compiler::BasicRuleCompiler;
use listup_core::config::ListupConfig;
use listup_core::records::{RecordDb, UpdateRecord};
use listup_core::retry::{self, RetryPolicy};
use listup_core::store::FsByteStore;
use listup_core::{Decision, TaskOutcome, UpdatePipeline, UpdateTask};
use std::path::Path;

use super::stage::stage_file;

/// One update cycle for `id` against the stored checksum, with retries.
/// On `Updated`, the record is written before returning.
pub(crate) async fn install_one(
    db: &RecordDb,
    store: &FsByteStore,
    cfg: &ListupConfig,
    id: &str,
    require_license: bool,
) -> Result<Decision> {
    let stored = db.get_record(id).await?;
    let task = UpdateTask::new(id)
        .external_checksum(stored.map(|r| r.last_checksum))
        .require_license(require_license);

    let pipeline = UpdatePipeline::new(store, BasicRuleCompiler)
        .report_compile_errors(cfg.report_compile_errors);
    let policy = RetryPolicy::from(&cfg.retry_config());
    let decision = retry::run_with_retry(&policy, || pipeline.run_update_cycle(&task));

    if let Some(record) = UpdateRecord::from_decision(id, &decision) {
        db.upsert_record(&record).await?;
    }
    Ok(decision)
}

fn describe(id: &str, decision: &Decision) -> String {
    match decision {
        Decision::Rejected => format!("{id}: rejected (no checksum and no license)"),
        Decision::AlreadyUpToDate { title } => {
            format!("{id}: already up to date ({})", title.as_deref().unwrap_or("untitled"))
        }
        Decision::Updated {
            metadata,
            filters_count,
            ..
        } => format!(
            "{id}: installed {filters_count} rules ({})",
            metadata.title.as_deref().unwrap_or("untitled")
        ),
        Decision::Failed(e) => format!("{id}: failed: {e}"),
    }
}

pub async fn run_install(
    db: &RecordDb,
    store: &FsByteStore,
    cfg: &ListupConfig,
    id: &str,
    file: Option<&Path>,
    require_license: bool,
    json: bool,
) -> Result<()> {
    if let Some(path) = file {
        stage_file(store, id, path)?;
    }

    let decision = install_one(db, store, cfg, id, require_license).await?;
    if json {
        println!("{}", serde_json::to_string(&TaskOutcome::from(&decision))?);
    } else {
        println!("{}", describe(id, &decision));
    }

    if let Decision::Failed(e) = decision {
        bail!("install {id} failed: {e}");
    }
    Ok(())
}

pub async fn run_update_all(
    db: &RecordDb,
    store: &FsByteStore,
    cfg: &ListupConfig,
    require_license: bool,
) -> Result<()> {
    let ids = store.staged_ids()?;
    if ids.is_empty() {
        println!("No staged downloads.");
        return Ok(());
    }

    let mut failed = 0usize;
    for id in &ids {
        let decision = install_one(db, store, cfg, id, require_license).await?;
        if decision.is_failed() {
            failed += 1;
        }
        println!("{}", describe(id, &decision));
    }

    if failed > 0 {
        bail!("{failed} of {} lists failed", ids.len());
    }
    Ok(())
}
