//! Checkpoint snapshot storage.
//!
//! The snapshot is the whole result sequence as a pretty-printed JSON array,
//! replaced on every expansion step. Writes land in a temporary file next to
//! the target and are renamed over it, so a reader sees either the previous
//! snapshot or the new one.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Episode;

/// Overwrite the snapshot at `path` with `episodes`.
pub fn write_snapshot(path: &Path, episodes: &[Episode]) -> ScrapeResult<()> {
    let json = serde_json::to_string_pretty(episodes)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ScrapeError::snapshot(path, e))?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| ScrapeError::snapshot(path, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| ScrapeError::snapshot(path, e))?;
    tmp.persist(path)
        .map_err(|e| ScrapeError::snapshot(path, e.error))?;

    debug!("Wrote {} episodes to {}", episodes.len(), path.display());
    Ok(())
}

/// Read the snapshot at `path`. A missing file is an empty snapshot.
pub fn read_snapshot(path: &Path) -> ScrapeResult<Vec<Episode>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ScrapeError::snapshot(path, e)),
    };
    Ok(serde_json::from_str(&content)?)
}
