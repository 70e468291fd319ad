//! Reference transcriptions ("ground truth") keyed by base filename.
//!
//! The directory holds one plain-text file per known source image, named
//! `{baseName}.{anyExtension}`. It is scanned on every lookup and never
//! written to.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ReferenceLibrary {
    dir: PathBuf,
}

/// File name without its last extension and without directory components.
///
/// `plate1.jpg` → `plate1`, `scans/plate1.tar.gz` → `plate1.tar`,
/// `.hidden` → `.hidden`.
pub fn base_name(filename: &str) -> Option<&OsStr> {
    Path::new(filename).file_stem()
}

impl ReferenceLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Content of the reference file whose base name equals the base name of
    /// `original_filename`, or `None`.
    ///
    /// When several files share the base name (`plate1.txt`, `plate1.md`) the
    /// alphabetically first file name wins. Any I/O or decoding failure is
    /// logged and reported as a miss.
    pub async fn lookup(&self, original_filename: &str) -> Option<String> {
        let target = base_name(original_filename)?;

        let path = match self.find_match(target).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(filename = %original_filename, "No reference transcription");
                return None;
            }
            Err(e) => {
                warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Reference directory unreadable"
                );
                return None;
            }
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), "Reference transcription found");
                Some(content)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read reference file");
                None
            }
        }
    }

    async fn find_match(&self, target: &OsStr) -> std::io::Result<Option<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.file_stem() != Some(target) {
                continue;
            }
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => candidates.push(path),
                _ => continue,
            }
        }

        candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(candidates.into_iter().next())
    }
}
