//! Keyed blob storage for staged downloads and compiled artifacts.
//!
//! Staged raw downloads live under `<id>.download`; compiled artifacts live
//! under the list id itself. `FsByteStore` writes each blob to `<key>.part`
//! and renames it into place, so a reader never sees a half-written artifact.

mod fs;
mod memory;

pub use fs::FsByteStore;
pub use memory::MemoryByteStore;

use std::path::PathBuf;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Suffix of the key holding a list's staged raw download.
pub const STAGED_SUFFIX: &str = ".download";

/// Error from a byte store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keyed byte storage used by the update pipeline.
///
/// A key that was never written (or was cleared) loads as an empty vector.
pub trait ByteStore {
    fn load_data(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    fn save_data(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Remove `key`. Clearing a missing key is not an error.
    fn clear_data(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: ByteStore + ?Sized> ByteStore for &T {
    fn load_data(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_data(key)
    }

    fn save_data(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_data(key, data)
    }

    fn clear_data(&self, key: &str) -> Result<(), StoreError> {
        (**self).clear_data(key)
    }
}

/// Store key of the staged raw download for list `id`.
pub fn staged_key(id: &str) -> String {
    format!("{id}{STAGED_SUFFIX}")
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// List ids are used verbatim as artifact keys and file names. An id may not
/// end in a reserved suffix, so no artifact key equals another list's staged
/// key or a temp file.
pub fn is_valid_id(id: &str) -> bool {
    is_plain_name(id) && !id.ends_with(STAGED_SUFFIX) && !id.ends_with(TEMP_SUFFIX)
}

/// A key is either a list id or the staged key of one.
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let id = key.strip_suffix(STAGED_SUFFIX).unwrap_or(key);
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_key_appends_suffix() {
        assert_eq!(staged_key("easylist"), "easylist.download");
    }

    #[test]
    fn id_validation() {
        assert!(is_valid_id("easylist"));
        assert!(is_valid_id("easy_list-2.v1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a b"));
    }

    #[test]
    fn reserved_suffixes_are_not_ids() {
        assert!(!is_valid_id("a.download"));
        assert!(!is_valid_id("a.part"));
        assert!(is_valid_id("a.downloads"));
    }

    #[test]
    fn temp_suffix_keys_rejected() {
        assert!(check_key("list.download").is_ok());
        assert!(matches!(
            check_key("list.part"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(check_key("list.download.download").is_err());
        assert!(check_key("list.part.download").is_err());
    }
}
