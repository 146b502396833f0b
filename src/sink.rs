//! Artifact persistence: one plain-text file per facet.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each task's extracted values to `<dir>/<facet>.txt`.
///
/// Facet names are unique, so every task writes to its own key and
/// concurrent writes within a run never contend. The absence of an artifact
/// after a run is the failure signal for that facet.
pub struct OutputSink {
    dir: PathBuf,
}

impl OutputSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory. Idempotent.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory {}", self.dir.display())
        })
    }

    /// Path of the artifact for a facet.
    pub fn artifact_path(&self, facet: &str) -> PathBuf {
        self.dir.join(format!("{facet}.txt"))
    }

    /// Write values newline-separated, replacing any previous artifact.
    pub fn persist(&self, facet: &str, values: &[String]) -> Result<PathBuf> {
        let path = self.artifact_path(facet);
        fs::write(&path, values.join("\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
