use super::types::{PreferenceState, PreferenceStore};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default preference file path (~/.config/pup-survey-helper/prefs.json)
pub fn get_prefs_path() -> PathBuf {
    crate::config::get_config_dir().join("prefs.json")
}

/// Load preference state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_prefs(path: &Path) -> Result<PreferenceState> {
    if !path.exists() {
        return Ok(PreferenceState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open preference file at {}", path.display()))?;

    let state: PreferenceState =
        serde_json::from_reader(file).context("Failed to load preferences")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported preference file version: {}", state.version);
    }

    Ok(state)
}

/// Save preference state to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_prefs(path: &Path, state: &PreferenceState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize preferences")?;

    file.commit().context("Failed to save preferences")?;

    Ok(())
}

/// Preference store persisted to a JSON file on every write.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    state: PreferenceState,
}

impl FilePreferenceStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let state = load_prefs(&path)?;
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str, default: f64) -> f64 {
        self.state.get(key).map_or(default, |e| e.value)
    }

    fn set(&mut self, key: &str, value: f64) -> Result<()> {
        let mut next = self.state.clone();
        next.set(key, value);
        save_prefs(&self.path, &next)?;
        self.state = next;
        tracing::debug!(key, value, path = %self.path.display(), "stored preference");
        Ok(())
    }
}
