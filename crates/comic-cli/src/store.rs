//! File-backed save endpoint: one JSON file per comic title.

use comic_editor::{SaveBackend, SavePayload, TransportError};
use log::debug;
use std::path::{Path, PathBuf};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a comic with `title` is written.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(title)))
    }
}

impl SaveBackend for FileStore {
    async fn save(&self, payload: &SavePayload) -> Result<(), TransportError> {
        let body = serde_json::to_vec_pretty(payload)
            .map_err(|err| TransportError::Rejected(err.to_string()))?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&payload.title);
        // The target file is only ever replaced by rename.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Lowercase ASCII slug; anything else collapses to single dashes.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("comic");
    }
    out
}
