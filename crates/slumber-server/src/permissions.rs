//! Permission management: ops and default nodes.
//!
//! Ops come from `server.toml` plus `ops.json`; only the JSON file is
//! written back.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::PermissionsSection;

/// Name the console issues commands under.
pub const CONSOLE: &str = "CONSOLE";

#[derive(Debug, Clone)]
pub struct PermissionManager {
    /// Display names of operators.
    pub ops: HashSet<String>,
    /// Nodes granted to every player.
    pub default_nodes: HashSet<String>,
    ops_file: PathBuf,
}

impl PermissionManager {
    /// Load ops from `ops_file` and merge in the configured ones.
    pub fn load(ops_file: impl Into<PathBuf>, section: &PermissionsSection) -> Self {
        let ops_file = ops_file.into();
        let mut ops = load_set(&ops_file);
        ops.extend(section.ops.iter().cloned());
        Self {
            ops,
            default_nodes: section.default_nodes.iter().cloned().collect(),
            ops_file,
        }
    }

    /// The console and ops hold every node.
    pub fn has(&self, name: &str, node: &str) -> bool {
        name == CONSOLE || self.ops.contains(name) || self.default_nodes.contains(node)
    }

    /// Save the ops list to disk.
    pub fn save_ops(&self) {
        save_set(&self.ops_file, &self.ops);
    }
}

/// Load a HashSet<String> from a JSON array file.
fn load_set(path: &Path) -> HashSet<String> {
    if !path.exists() {
        return HashSet::new();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
            Ok(vec) => {
                info!("Loaded {} entries from {}", vec.len(), path.display());
                vec.into_iter().collect()
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                HashSet::new()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            HashSet::new()
        }
    }
}

/// Save a HashSet<String> as a sorted JSON array.
fn save_set(path: &Path, set: &HashSet<String>) {
    let mut sorted: Vec<&String> = set.iter().collect();
    sorted.sort();
    match serde_json::to_string_pretty(&sorted) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!("Failed to write {}: {e}", path.display());
            }
        }
        Err(e) => warn!("Failed to serialize {}: {e}", path.display()),
    }
}
