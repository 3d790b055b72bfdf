//! Persistence for tracking state in a TOML file.

use super::{TRACKING_VERSION, TrackedStore, TrackingState};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Load tracking state from disk.
///
/// Returns an empty `TrackingState` if the file doesn't exist.
pub fn load_tracking(path: &Path) -> Result<TrackingState> {
    if !path.exists() {
        return Ok(TrackingState::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Tracking(format!("failed to read {}: {e}", path.display())))?;

    let state: TrackingState = toml::from_str(&content)
        .map_err(|e| Error::Tracking(format!("failed to parse {}: {e}", path.display())))?;

    Ok(state)
}

/// Save tracking state to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_tracking(path: &Path, state: &TrackingState) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Tracking(format!("failed to create {}: {e}", dir.display())))?;
    }

    let mut state_to_save = state.clone();
    state_to_save.version = TRACKING_VERSION;

    let content = toml::to_string_pretty(&state_to_save)
        .map_err(|e| Error::Tracking(format!("failed to serialize tracking state: {e}")))?;

    let content_with_header = format!(
        "# automerge tracked pull requests\n# Auto-generated - manual edits may be overwritten\n\n{content}"
    );

    fs::write(path, content_with_header)
        .map_err(|e| Error::Tracking(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}

/// Tracking state kept in a TOML file
///
/// Every mutation reloads the file, applies the change and writes it back.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path` (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut TrackingState) -> bool) -> Result<bool> {
        let mut state = load_tracking(&self.path)?;
        let changed = apply(&mut state);
        if changed {
            save_tracking(&self.path, &state)?;
        }
        Ok(changed)
    }
}

impl TrackedStore for FileStore {
    fn list(&self) -> Result<Vec<String>> {
        let state = load_tracking(&self.path)?;
        Ok(state.urls().into_iter().map(String::from).collect())
    }

    fn add(&self, url: &str) -> Result<bool> {
        self.update(|state| state.track(url))
    }

    fn remove(&self, url: &str) -> Result<bool> {
        self.update(|state| state.untrack(url))
    }
}
