use super::turn::Turn;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Fixed storage key of the mirrored transcript
pub const CACHE_KEY: &str = "conversationTranscript";

/// Local-disk mirror of the current transcript.
///
/// A convenience cache only: the controller's in-memory log is
/// authoritative, and write failures are logged by the caller rather than
/// failing the session.
#[derive(Debug, Clone)]
pub struct TranscriptCache {
    path: PathBuf,
}

impl TranscriptCache {
    /// Cache stored as `<dir>/conversationTranscript.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", CACHE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the cached transcript. An empty log removes the entry.
    pub async fn store(&self, turns: &[Turn]) -> Result<()> {
        if turns.is_empty() {
            return self.clear().await;
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache dir {}", parent.display()))?;
        }

        let json = serde_json::to_vec(turns)?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!("Cached {} turns at {}", turns.len(), self.path.display());
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }

    /// Read the cached transcript back; a missing entry is an empty transcript
    pub async fn load(&self) -> Result<Vec<Turn>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt transcript cache at {}", self.path.display()))
    }
}
