// Local preferences for this terminal (not stored on the account)
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::{AppResult, CommsMode};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocalPrefs {
    pub compact_feed: bool,
    pub show_presence: bool,
    pub default_comms_mode: CommsMode,
}

impl Default for LocalPrefs {
    fn default() -> Self {
        Self {
            compact_feed: false,
            show_presence: true,
            default_comms_mode: CommsMode::Global,
        }
    }
}

impl LocalPrefs {
    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".hackmate_prefs.json")
    }

    /// A missing file yields defaults; an unreadable one is an error.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

struct PrefsCell {
    path: PathBuf,
    prefs: RwLock<LocalPrefs>,
}

static LOCAL_PREFS: OnceCell<PrefsCell> = OnceCell::new();

/// Load preferences from `path` once. A corrupt file is logged and replaced by defaults.
pub fn init_local_prefs(path: PathBuf) -> LocalPrefs {
    let prefs = LocalPrefs::load_from(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable preferences file");
        LocalPrefs::default()
    });
    debug!(path = %path.display(), ?prefs, "local preferences loaded");
    let _ = LOCAL_PREFS.set(PrefsCell { path, prefs: RwLock::new(prefs.clone()) });
    prefs
}

/// Apply `change` and write the result back to disk.
pub fn update_local_prefs(change: impl FnOnce(&mut LocalPrefs)) -> AppResult<()> {
    let Some(cell) = LOCAL_PREFS.get() else {
        return Ok(());
    };
    let mut prefs = cell.prefs.write().unwrap_or_else(|e| e.into_inner());
    change(&mut prefs);
    prefs.save_to(&cell.path)
}
