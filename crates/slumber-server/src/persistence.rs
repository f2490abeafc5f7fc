//! World state persistence.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-world state stored in `<worlds>/<name>/level.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub time: i64,
    pub raining: bool,
    pub thundering: bool,
    #[serde(default)]
    pub last_played: i64,
}

impl LevelData {
    pub fn new(time: i64) -> Self {
        Self {
            time,
            raining: false,
            thundering: false,
            last_played: unix_timestamp(),
        }
    }

    /// Load a world's level file. `None` if the world was never saved.
    pub fn load(world_dir: &Path) -> Option<Self> {
        let path = world_dir.join("level.json");
        let data = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&data) {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                None
            }
        }
    }

    /// Save to `<world_dir>/level.json`, keeping the previous file as a backup.
    pub fn save(&mut self, world_dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(world_dir)?;
        let path = world_dir.join("level.json");
        if path.exists() {
            std::fs::copy(&path, path.with_extension("json_old")).ok();
        }
        self.last_played = unix_timestamp();
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&path, json)
    }
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
