//! # JSON Snapshot File
//!
//! Stores a `LedgerSnapshot` as pretty-printed JSON. Writes go to a sibling
//! temporary file that is renamed over the target, so a crash never leaves a
//! half-written snapshot behind.

use crate::domain::snapshot::LedgerSnapshot;
use crate::errors::SnapshotError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot persisted at a filesystem path.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and parses the snapshot. Does not validate it; see
    /// [`LedgerSnapshot::restore`].
    pub fn load(&self) -> Result<LedgerSnapshot, SnapshotError> {
        let bytes = fs::read(&self.path)?;
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)?;
        debug!(
            path = %self.path.display(),
            issues = snapshot.issues.len(),
            events = snapshot.events.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Atomically replaces the file with `snapshot`.
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
