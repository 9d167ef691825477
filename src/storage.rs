//! Persistence layer.
//!
//! Only a tiny metadata document survives restarts: the demo-mode flag
//! and the demo cursor, so a restarted process resumes the scripted
//! sequence where it left off. Displayed content is always recomputed.
//! A missing or corrupt file means "no prior state", never an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default metadata file path, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "runtime/state.json";

/// On-disk document: `{"meta": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistedState {
    #[serde(default)]
    pub meta: PersistedMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistedMeta {
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub demo_idx: Option<usize>,
}

/// Save metadata, creating the runtime directory if needed.
/// Callers treat failures as fire-and-forget.
pub fn save_meta(path: &Path, meta: &PersistedMeta) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create runtime dir {}", dir.display()))?;
    }
    let doc = PersistedState { meta: meta.clone() };
    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize metadata")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write metadata to {}", path.display()))?;
    debug!(path = %path.display(), demo_idx = ?meta.demo_idx, "Metadata saved");
    Ok(())
}

/// Load metadata. Absent or unparseable file yields `None`.
pub fn load_meta(path: &Path) -> Option<PersistedMeta> {
    let json = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<PersistedState>(&json) {
        Ok(doc) => {
            info!(path = %path.display(), demo_idx = ?doc.meta.demo_idx, "Metadata loaded");
            Some(doc.meta)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring corrupt metadata file");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
