pub mod storage;
pub mod types;

pub use storage::{get_prefs_path, load_prefs, save_prefs, FilePreferenceStore};
pub use types::{MemoryPreferenceStore, PreferenceEntry, PreferenceState, PreferenceStore};
