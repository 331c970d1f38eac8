//! Directory-backed byte store: one file per key.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{check_key, is_valid_id, ByteStore, StoreError, STAGED_SUFFIX, TEMP_SUFFIX};

/// Byte store rooted at a directory. Created on `open` if missing.
#[derive(Debug, Clone)]
pub struct FsByteStore {
    root: PathBuf,
}

fn io_err(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { op, path, source }
}

impl FsByteStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_err("create dir", &root))?;
        Ok(Self { root })
    }

    /// Default location: `~/.local/state/listup/store`.
    pub fn default_root() -> anyhow::Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("listup")?;
        Ok(xdg_dirs.get_state_home().join("listup").join("store"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        check_key(key)?;
        Ok(self.root.join(key))
    }

    /// Ids that currently have a staged download, sorted.
    pub fn staged_ids(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(io_err("read dir", &self.root))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err("read dir", &self.root))?;
            let name = entry.file_name();
            let staged = name.to_str().and_then(|n| n.strip_suffix(STAGED_SUFFIX));
            match staged {
                Some(id) if is_valid_id(id) => ids.push(id.to_string()),
                Some(_) => tracing::warn!("ignoring staged file {:?}", name),
                None => {}
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl ByteStore for FsByteStore {
    fn load_data(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io_err("read", &path)(e)),
        }
    }

    fn save_data(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let mut file = File::create(&tmp).map_err(io_err("create", &tmp))?;
        file.write_all(data).map_err(io_err("write", &tmp))?;
        file.sync_all().map_err(io_err("sync", &tmp))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(io_err("rename", &tmp))?;
        tracing::trace!(key, bytes = data.len(), "saved blob");
        Ok(())
    }

    fn clear_data(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("remove", &path)(e)),
        }
    }
}
