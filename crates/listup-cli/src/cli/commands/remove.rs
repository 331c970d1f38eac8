//! `listup remove <id>` – drop a list's record, artifact and staged download.

use anyhow::Result;
use listup_core::records::RecordDb;
use listup_core::store::{self, ByteStore, FsByteStore};

pub async fn run_remove(
    db: &RecordDb,
    store: &FsByteStore,
    id: &str,
    keep_artifact: bool,
) -> Result<()> {
    let existed = db.remove_record(id).await?;
    if store::is_valid_id(id) {
        store.clear_data(&store::staged_key(id))?;
        if !keep_artifact {
            store.clear_data(id)?;
            tracing::debug!(id, "deleted compiled artifact");
        }
    }

    if existed {
        println!("Removed {id}");
    } else {
        println!("No record for {id}");
    }
    Ok(())
}
