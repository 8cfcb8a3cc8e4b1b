//! Filesystem infrastructure — implements `LocalFiles`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFiles;

/// Production filesystem implementation of `LocalFiles`.
pub struct LocalFs;

impl LocalFiles for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))
    }

    fn write_text(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))
    }
}
