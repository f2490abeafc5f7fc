//! Sleep statistics and their on-disk form.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StatsError;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct StatsFile {
    total_sleep_count: u64,
    manual_skips: u64,
    last_updated: u64,
    players: Vec<PlayerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayerEntry {
    name: String,
    count: u64,
}

/// Counters for skipped nights and per-player sleeps.
///
/// Player counts keep insertion order so ties in [`top`](Self::top) are stable.
#[derive(Debug, Default)]
pub struct SleepStatistics {
    total_sleeps: u64,
    manual_skips: u64,
    players: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl SleepStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A night skipped by sleeping.
    pub fn record_sleep_event(&mut self) {
        self.total_sleeps += 1;
        debug!("Sleep count incremented to {}", self.total_sleeps);
    }

    /// A night skipped by command.
    pub fn record_manual_skip(&mut self) {
        self.manual_skips += 1;
        debug!("Manual skip count incremented to {}", self.manual_skips);
    }

    pub fn record_player_sleep(&mut self, name: &str) {
        let count = match self.index.get(name) {
            Some(&i) => {
                self.players[i].1 += 1;
                self.players[i].1
            }
            None => {
                self.index.insert(name.to_string(), self.players.len());
                self.players.push((name.to_string(), 1));
                1
            }
        };
        debug!("Player {name} sleep count: {count}");
    }

    pub fn total_sleeps(&self) -> u64 {
        self.total_sleeps
    }

    pub fn manual_skips(&self) -> u64 {
        self.manual_skips
    }

    pub fn player_count(&self, name: &str) -> u64 {
        self.index.get(name).map_or(0, |&i| self.players[i].1)
    }

    /// The `n` most frequent sleepers, highest first.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.players.clone();
        // sort_by is stable: ties keep insertion order.
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    pub fn load(path: &Path) -> Result<Self, StatsError> {
        let data = std::fs::read_to_string(path).map_err(|source| StatsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: StatsFile = toml::from_str(&data)?;
        let mut stats = Self {
            total_sleeps: file.total_sleep_count,
            manual_skips: file.manual_skips,
            ..Self::default()
        };
        for entry in file.players {
            match stats.index.get(&entry.name) {
                Some(&i) => stats.players[i].1 += entry.count,
                None => {
                    stats.index.insert(entry.name.clone(), stats.players.len());
                    stats.players.push((entry.name, entry.count));
                }
            }
        }
        Ok(stats)
    }

    /// Load from `path`, or start empty if it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(stats) => {
                info!(
                    "Statistics loaded: {} sleeps, {} manual skips, {} players",
                    stats.total_sleeps,
                    stats.manual_skips,
                    stats.players.len()
                );
                stats
            }
            Err(e) => {
                warn!("{e}; starting with empty statistics");
                Self::default()
            }
        }
    }

    /// Write to `path`, stamping `now` (unix millis) as the update time.
    pub fn save(&self, path: &Path, now: u64) -> Result<(), StatsError> {
        let file = StatsFile {
            total_sleep_count: self.total_sleeps,
            manual_skips: self.manual_skips,
            last_updated: now,
            players: self
                .players
                .iter()
                .map(|(name, count)| PlayerEntry {
                    name: name.clone(),
                    count: *count,
                })
                .collect(),
        };
        let text = toml::to_string(&file)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StatsError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| StatsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Statistics saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("slumber-stats-{}-{name}", std::process::id()))
            .join("statistics.toml")
    }

    #[test]
    fn counters() {
        let mut s = SleepStatistics::new();
        s.record_sleep_event();
        s.record_sleep_event();
        s.record_manual_skip();
        assert_eq!(s.total_sleeps(), 2);
        assert_eq!(s.manual_skips(), 1);
    }

    #[test]
    fn player_counts() {
        let mut s = SleepStatistics::new();
        s.record_player_sleep("Alex");
        s.record_player_sleep("Alex");
        s.record_player_sleep("Sam");
        assert_eq!(s.player_count("Alex"), 2);
        assert_eq!(s.player_count("Sam"), 1);
        assert_eq!(s.player_count("Nobody"), 0);
    }

    #[test]
    fn top_sorts_descending_with_stable_ties() {
        let mut s = SleepStatistics::new();
        for name in ["Cat", "Bo", "Ann", "Bo", "Ann", "Dee"] {
            s.record_player_sleep(name);
        }
        // Bo and Ann tie at 2; Bo was seen first. Cat and Dee tie at 1.
        assert_eq!(
            s.top(3),
            vec![
                ("Bo".to_string(), 2),
                ("Ann".to_string(), 2),
                ("Cat".to_string(), 1)
            ]
        );
        assert_eq!(s.top(10).len(), 4);
        assert!(s.top(0).is_empty());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let mut s = SleepStatistics::new();
        s.record_sleep_event();
        s.record_manual_skip();
        s.record_player_sleep("Zed");
        s.record_player_sleep("Amy");
        s.record_player_sleep("Amy");
        s.save(&path, 1_700_000_000_000).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("total-sleep-count = 1"));
        assert!(text.contains("last-updated = 1700000000000"));

        let loaded = SleepStatistics::load(&path).unwrap();
        assert_eq!(loaded.total_sleeps(), 1);
        assert_eq!(loaded.manual_skips(), 1);
        assert_eq!(loaded.player_count("Amy"), 2);
        // Order survives the trip: Zed was first.
        assert_eq!(loaded.players[0].0, "Zed");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_empty() {
        let s = SleepStatistics::load_or_default(Path::new("/nonexistent/slumber/stats.toml"));
        assert_eq!(s.total_sleeps(), 0);
    }

    #[test]
    fn malformed_file_falls_back() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "total-sleep-count = \"many\"").unwrap();
        assert!(matches!(SleepStatistics::load(&path), Err(StatsError::Parse(_))));
        assert_eq!(SleepStatistics::load_or_default(&path).total_sleeps(), 0);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
