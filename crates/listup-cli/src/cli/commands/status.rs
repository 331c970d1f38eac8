//! `listup status` – show installed filter lists.

use anyhow::Result;
use listup_core::records::{unix_timestamp, RecordDb};

pub async fn run_status(db: &RecordDb) -> Result<()> {
    let records = db.list_records().await?;
    if records.is_empty() {
        println!("No filter lists installed.");
        return Ok(());
    }

    let now = unix_timestamp();
    println!("{:<20} {:>8} {:<4} {}", "ID", "RULES", "DUE", "TITLE");
    for r in records {
        println!(
            "{:<20} {:>8} {:<4} {}",
            r.id,
            r.filters_count,
            if r.is_due(now) { "yes" } else { "no" },
            r.title.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
