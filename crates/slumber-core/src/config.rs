//! Plugin configuration.
//!
//! Stored as JSON in `plugins/<name>/config.json`. Every field has a
//! default, so a partial or empty document is always valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slumber_plugin_api::{BossBarColor, BossBarOverlay};
use tracing::warn;

use crate::time::ticks_to_millis;

/// Built-in message templates. Keys missing from the config fall back here.
const DEFAULT_MESSAGES: [(&str, &str); 9] = [
    ("player-sleeping", "&e{player} is sleeping. Sweet dreams!"),
    ("player-woke-up", "&7{player} woke up. The night goes on."),
    ("good-morning", "&6Good morning! The night has been skipped."),
    ("no-permission", "&cYou don't have permission to do that."),
    ("on-cooldown", "&cNight skipping is on cooldown for {seconds} more seconds."),
    ("manual-skip", "&6{player} manually skipped the night!"),
    ("not-night", "&cIt's not night time in world {world}!"),
    ("world-not-found", "&cWorld '{world}' not found!"),
    ("world-required", "&cYou must specify a world name when using from console!"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SleepConfig {
    /// Ticks between enough players sleeping and the night being skipped.
    pub sleep_delay_ticks: u64,
    /// Require `sleep_percentage` of eligible players instead of one.
    pub percentage_mode: bool,
    pub sleep_percentage: u32,
    pub cooldown_seconds: u64,
    pub clear_weather: bool,
    pub auto_save: AutoSaveSection,
    pub smooth_sleep: SmoothSleepSection,
    pub afk: AfkSection,
    pub boss_bar: BossBarSection,
    pub effects: EffectsSection,
    /// Worlds the plugin acts in. Empty means all.
    pub enabled_worlds: Vec<String>,
    pub debug_mode: bool,
    pub log_sleep_events: bool,
    pub update_checker: UpdateCheckerSection,
    pub messages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AutoSaveSection {
    pub enabled: bool,
    pub delay_ticks: u64,
}

impl Default for AutoSaveSection {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SmoothSleepSection {
    pub enabled: bool,
    /// World-time ticks added per server tick while fast-forwarding.
    pub speed: i64,
}

impl Default for SmoothSleepSection {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AfkSection {
    pub enabled: bool,
    pub timeout_seconds: u64,
    /// Leave AFK players out of the eligible count.
    pub ignore_afk_players: bool,
    pub check_interval_ticks: u64,
}

impl Default for AfkSection {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: 300,
            ignore_afk_players: true,
            check_interval_ticks: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BossBarSection {
    pub enabled: bool,
    /// Placeholders: `{player}`, `{percentage}`, `{current}`, `{required}`, `{total}`.
    pub title: String,
    /// Placeholders: `{seconds}`.
    pub countdown_title: String,
    pub color: String,
    pub style: String,
}

impl Default for BossBarSection {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "&e{current}/{required} sleeping &7({percentage}%)".into(),
            countdown_title: "&6Skipping the night in {seconds}s".into(),
            color: "BLUE".into(),
            style: "SOLID".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EffectsSection {
    pub particles: bool,
    pub sounds: bool,
    pub optimize_particles: bool,
    pub max_particles_per_player: u32,
}

impl Default for EffectsSection {
    fn default() -> Self {
        Self {
            particles: true,
            sounds: true,
            optimize_particles: true,
            max_particles_per_player: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UpdateCheckerSection {
    pub enabled: bool,
    /// GitHub `owner/name` whose latest release is compared against ours.
    pub repository: String,
}

impl Default for UpdateCheckerSection {
    fn default() -> Self {
        Self {
            enabled: true,
            repository: "mrsuffix/SinglePlayerSleep".into(),
        }
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            sleep_delay_ticks: 65,
            percentage_mode: false,
            sleep_percentage: 50,
            cooldown_seconds: 30,
            clear_weather: true,
            auto_save: AutoSaveSection::default(),
            smooth_sleep: SmoothSleepSection::default(),
            afk: AfkSection::default(),
            boss_bar: BossBarSection::default(),
            effects: EffectsSection::default(),
            enabled_worlds: Vec::new(),
            debug_mode: false,
            log_sleep_events: true,
            update_checker: UpdateCheckerSection::default(),
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SleepConfig {
    /// Build a config from a JSON document. Keys whose values do not parse
    /// are dropped one by one and fall back to their defaults.
    pub fn from_json(value: Value) -> Self {
        match Self::deserialize(&value) {
            Ok(config) => config.validated(),
            Err(e) => {
                warn!("Invalid sleep config: {e}");
                let Value::Object(patch) = value else {
                    return Self::default();
                };
                let mut merged = Self::default().to_json();
                merge_valid(&mut merged, &mut Vec::new(), patch);
                Self::deserialize(&merged).unwrap_or_default().validated()
            }
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Clamp out-of-range values.
    pub fn validated(mut self) -> Self {
        if self.sleep_percentage > 100 {
            warn!(
                "sleep-percentage {} is above 100, clamping",
                self.sleep_percentage
            );
            self.sleep_percentage = 100;
        }
        if self.smooth_sleep.speed <= 0 {
            warn!(
                "smooth-sleep.speed {} must be positive, using 100",
                self.smooth_sleep.speed
            );
            self.smooth_sleep.speed = 100;
        }
        if self.afk.check_interval_ticks == 0 {
            self.afk.check_interval_ticks = 1;
        }
        self
    }

    pub fn is_world_enabled(&self, world: &str) -> bool {
        self.enabled_worlds.is_empty() || self.enabled_worlds.iter().any(|w| w == world)
    }

    pub fn sleep_delay_ms(&self) -> u64 {
        ticks_to_millis(self.sleep_delay_ticks)
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_seconds.saturating_mul(1000)
    }

    pub fn afk_timeout_ms(&self) -> u64 {
        self.afk.timeout_seconds.saturating_mul(1000)
    }

    /// Message template for `key`, from config, then built-ins.
    pub fn message(&self, key: &str) -> String {
        if let Some(m) = self.messages.get(key) {
            return m.clone();
        }
        DEFAULT_MESSAGES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| format!("&cMessage not found: {key}"))
    }

    pub fn boss_bar_color(&self) -> BossBarColor {
        parse_color(&self.boss_bar.color)
    }

    pub fn boss_bar_overlay(&self) -> BossBarOverlay {
        parse_overlay(&self.boss_bar.style)
    }
}

/// Overlay `patch` onto `root` key by key, skipping every value that would
/// make `root` fail to deserialize as a [`SleepConfig`].
fn merge_valid(root: &mut Value, path: &mut Vec<String>, patch: Map<String, Value>) {
    for (key, value) in patch {
        path.push(key);
        let nested = value.is_object() && object_at(root, path).is_some();
        match value {
            Value::Object(inner) if nested => merge_valid(root, path, inner),
            value => {
                let mut candidate = root.clone();
                if let Some((last, parent)) = path.split_last() {
                    if let Some(obj) = object_at(&mut candidate, parent) {
                        obj.insert(last.clone(), value);
                    }
                }
                if SleepConfig::deserialize(&candidate).is_ok() {
                    *root = candidate;
                } else {
                    warn!("Ignoring invalid config value for '{}'", path.join("."));
                }
            }
        }
        path.pop();
    }
}

fn object_at<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Map<String, Value>> {
    path.iter()
        .try_fold(root.as_object_mut()?, |obj, key| obj.get_mut(key)?.as_object_mut())
}

fn parse_color(name: &str) -> BossBarColor {
    match name.to_uppercase().as_str() {
        "PINK" => BossBarColor::Pink,
        "BLUE" => BossBarColor::Blue,
        "RED" => BossBarColor::Red,
        "GREEN" => BossBarColor::Green,
        "YELLOW" => BossBarColor::Yellow,
        "PURPLE" => BossBarColor::Purple,
        "WHITE" => BossBarColor::White,
        _ => {
            warn!("Invalid boss bar color: {name}. Defaulting to BLUE.");
            BossBarColor::Blue
        }
    }
}

fn parse_overlay(name: &str) -> BossBarOverlay {
    match name.to_uppercase().as_str() {
        "SOLID" | "PROGRESS" => BossBarOverlay::Progress,
        "SEGMENTED_6" | "NOTCHED_6" => BossBarOverlay::Notched6,
        "SEGMENTED_10" | "NOTCHED_10" => BossBarOverlay::Notched10,
        "SEGMENTED_12" | "NOTCHED_12" => BossBarOverlay::Notched12,
        "SEGMENTED_20" | "NOTCHED_20" => BossBarOverlay::Notched20,
        _ => {
            warn!("Invalid boss bar style: {name}. Defaulting to SOLID.");
            BossBarOverlay::Progress
        }
    }
}
