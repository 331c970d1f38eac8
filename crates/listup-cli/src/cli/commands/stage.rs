//! `listup stage <id> <path>` – copy a downloaded list into the store.

use anyhow::{bail, Context, Result};
use listup_core::store::{self, ByteStore, FsByteStore};
use std::path::Path;

/// Save the file at `path` as the staged download of `id`. Returns the byte count.
pub(crate) fn stage_file(store: &FsByteStore, id: &str, path: &Path) -> Result<usize> {
    if !store::is_valid_id(id) {
        bail!("invalid list id {id:?} (use letters, digits, '-', '_' or '.')");
    }
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    store.save_data(&store::staged_key(id), &data)?;
    tracing::info!(id, bytes = data.len(), "staged {}", path.display());
    Ok(data.len())
}

pub fn run_stage(store: &FsByteStore, id: &str, path: &Path) -> Result<()> {
    let n = stage_file(store, id, path)?;
    println!("Staged {id} ({n} bytes)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_copies_file_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsByteStore::open(dir.path().join("store")).unwrap();
        let src = dir.path().join("list.txt");
        std::fs::write(&src, b"||a^\n").unwrap();

        assert_eq!(stage_file(&store, "list", &src).unwrap(), 5);
        assert_eq!(store.load_data("list.download").unwrap(), b"||a^\n");
    }

    #[test]
    fn stage_rejects_bad_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsByteStore::open(dir.path()).unwrap();
        let src = dir.path().join("list.txt");
        std::fs::write(&src, b"||a^\n").unwrap();
        assert!(stage_file(&store, "../x", &src).is_err());
        assert!(stage_file(&store, "list.download", &src).is_err());
        assert!(!dir.path().join("list.download.download").exists());
    }
}
