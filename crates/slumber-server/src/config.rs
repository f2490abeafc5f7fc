use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub worlds: WorldsSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub permissions: PermissionsSection,
    #[serde(default)]
    pub plugins: PluginsSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub motd: String,
    /// Game mode given to players who join without naming one.
    #[serde(default = "default_gamemode")]
    pub gamemode: String,
}

fn default_gamemode() -> String {
    "survival".into()
}

#[derive(Debug, Deserialize)]
pub struct WorldsSection {
    pub names: Vec<String>,
    /// World new players spawn in. Defaults to the first of `names`.
    #[serde(default)]
    pub default: Option<String>,
    /// Time a freshly created world starts at.
    #[serde(default)]
    pub start_time: i64,
    #[serde(default = "default_true")]
    pub daylight_cycle: bool,
    /// Where world state is saved.
    #[serde(default = "default_worlds_directory")]
    pub directory: String,
}

fn default_true() -> bool {
    true
}

fn default_worlds_directory() -> String {
    "worlds".into()
}

impl WorldsSection {
    pub fn default_world(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.names.first().map(String::as_str))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsSection {
    /// Players granted every permission node.
    #[serde(default)]
    pub ops: Vec<String>,
    /// Nodes every player holds.
    #[serde(default)]
    pub default_nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PluginsSection {
    #[serde(default = "default_plugins_directory")]
    pub directory: String,
}

fn default_plugins_directory() -> String {
    "plugins".into()
}

impl Default for PluginsSection {
    fn default() -> Self {
        Self {
            directory: default_plugins_directory(),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        if config.worlds.names.is_empty() {
            return Err("[worlds] names must list at least one world".into());
        }
        Ok(config)
    }
}
