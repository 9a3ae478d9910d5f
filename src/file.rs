// File handles: the resolved form of a path the user dropped or picked.
// Metadata is read once up front so the controller and the transfer
// worker never have to stat the file again.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A file selected for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl FileHandle {
    /// Resolve `path` into a handle. Fails for missing paths and for
    /// anything that is not a regular file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .with_context(|| format!("Failed to read metadata of {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(FileHandle {
            path: path.to_path_buf(),
            name,
            content_type: guess_content_type(path),
            size: meta.len(),
        })
    }
}

/// Content type sent to the negotiation endpoint. Unknown extensions fall
/// back to `application/octet-stream`.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
