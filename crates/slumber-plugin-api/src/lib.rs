//! Plugin API: traits, events, and server API for plugin authors.
//!
//! This crate defines the interface between a host server and its plugins.
//! It has no dependency on the sleep engine or on any host implementation.

// ─── Types ───────────────────────────────────────────────────────────────────

/// Game mode of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    /// Parse a game mode from its name or numeric id. Unknown values map to Survival.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "creative" | "c" | "1" => GameMode::Creative,
            "adventure" | "a" | "2" => GameMode::Adventure,
            "spectator" | "sp" | "3" => GameMode::Spectator,
            _ => GameMode::Survival,
        }
    }

    /// Whether players in this mode take part in sleeping at all.
    pub fn counts_for_sleep(self) -> bool {
        !matches!(self, GameMode::Creative | GameMode::Spectator)
    }
}

/// Information about an online player, passed to plugins in events.
#[derive(Debug, Clone)]
pub struct PluginPlayer {
    pub name: String,
    pub uuid: String,
    /// Name of the world the player is in.
    pub world: String,
    pub position: (f32, f32, f32),
    pub gamemode: GameMode,
    /// Whether the player is currently lying in a bed.
    pub sleeping: bool,
}

/// Information about a loaded world.
#[derive(Debug, Clone)]
pub struct PluginWorld {
    pub name: String,
    /// Full world time in ticks (not wrapped to a single day).
    pub time: i64,
    pub raining: bool,
    pub thundering: bool,
}

/// Boss bar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BossBarColor {
    Pink,
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
    White,
}

/// Boss bar segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BossBarOverlay {
    #[default]
    Progress,
    Notched6,
    Notched10,
    Notched12,
    Notched20,
}

/// Everything the client needs to draw one boss bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BossBarView {
    /// Host-unique handle for this bar.
    pub id: u64,
    pub title: String,
    /// Fill fraction, 0.0–1.0.
    pub progress: f32,
    pub color: BossBarColor,
    pub overlay: BossBarOverlay,
}

/// Log level for plugin logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Result of dispatching an event to a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue normal handling.
    Continue,
    /// Event was cancelled by this plugin.
    Cancelled,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// All events that plugins can listen to.
#[derive(Debug, Clone)]
pub enum PluginEvent {
    // --- Player events ---
    PlayerJoin {
        player: PluginPlayer,
    },
    PlayerQuit {
        player: PluginPlayer,
    },
    PlayerMove {
        player: PluginPlayer,
        from: (f32, f32, f32),
        to: (f32, f32, f32),
    },
    PlayerInteract {
        player: PluginPlayer,
    },
    PlayerCommand {
        player: PluginPlayer,
        command: String,
        args: Vec<String>,
    },

    // --- Bed events ---
    /// A player has lain down. `player.sleeping` is already true.
    PlayerBedEnter {
        player: PluginPlayer,
    },
    /// A player has got up. `player.sleeping` is already false.
    PlayerBedLeave {
        player: PluginPlayer,
    },

    // --- World events ---
    WeatherChange {
        world: String,
        raining: bool,
        thundering: bool,
    },
    TimeChange {
        world: String,
        new_time: i64,
    },

    // --- Server events ---
    ServerStarted,
    ServerStopping,
}

impl PluginEvent {
    /// Whether this event type can be cancelled by a plugin.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            PluginEvent::PlayerMove { .. }
                | PluginEvent::PlayerInteract { .. }
                | PluginEvent::PlayerCommand { .. }
                | PluginEvent::PlayerBedEnter { .. }
                | PluginEvent::WeatherChange { .. }
                | PluginEvent::TimeChange { .. }
        )
    }
}

// ─── Plugin trait ────────────────────────────────────────────────────────────

/// Metadata about a plugin.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

/// The Plugin trait: implemented by anything the host loads.
pub trait Plugin: Send {
    /// Return plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Called when the plugin is loaded. Use `api` to register commands, schedule tasks.
    fn on_enable(&mut self, api: &mut dyn ServerApi);

    /// Called when the plugin is unloaded.
    fn on_disable(&mut self) {}

    /// Called for every dispatched event. Return `Cancelled` to cancel cancellable events.
    fn on_event(&mut self, event: &PluginEvent, api: &mut dyn ServerApi) -> EventResult {
        let _ = (event, api);
        EventResult::Continue
    }

    /// Called when a scheduled task fires.
    fn on_task(&mut self, task_id: u32, api: &mut dyn ServerApi) {
        let _ = (task_id, api);
    }

    /// Called when a plugin-registered command is executed. Return a response message.
    fn on_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: &str,
        api: &mut dyn ServerApi,
    ) -> Option<String> {
        let _ = (command, args, sender, api);
        None
    }

    /// Return a default config as JSON. If `Some`, the plugin gets a config file.
    fn default_config(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called with the loaded config (from `plugins/<name>/config.json`).
    fn load_config(&mut self, _config: serde_json::Value) {}
}

// ─── Server API ──────────────────────────────────────────────────────────────

/// Safe read/write access to server state, passed to plugins during callbacks.
///
/// Read methods return data immediately. Write methods are deferred (applied
/// after the plugin callback returns).
pub trait ServerApi {
    // --- Players ---
    fn online_players(&self) -> Vec<PluginPlayer>;
    fn get_player(&self, name: &str) -> Option<PluginPlayer>;
    /// Whether `name` holds the permission `node`. The console holds every node.
    fn has_permission(&self, name: &str, node: &str) -> bool;
    fn send_message(&mut self, player_name: &str, message: &str);
    fn broadcast_message(&mut self, message: &str);

    // --- Worlds ---
    fn worlds(&self) -> Vec<PluginWorld>;
    fn get_world(&self, name: &str) -> Option<PluginWorld>;
    fn set_time(&mut self, world: &str, time: i64);
    fn set_weather(&mut self, world: &str, raining: bool, thundering: bool);
    fn save_world(&mut self, world: &str);

    // --- Presentation ---
    fn show_boss_bar(&mut self, player_name: &str, bar: &BossBarView);
    fn update_boss_bar(&mut self, player_name: &str, bar: &BossBarView);
    fn hide_boss_bar(&mut self, player_name: &str, bar_id: u64);
    fn play_sound(&mut self, world: &str, position: (f32, f32, f32), sound: &str, volume: f32, pitch: f32);
    fn spawn_particles(&mut self, world: &str, position: (f32, f32, f32), particle: &str, count: u32);

    // --- Server ---
    fn get_tick(&self) -> u64;
    fn log(&self, level: LogLevel, message: &str);

    // --- Scheduler ---
    fn schedule_delayed(&mut self, plugin_name: &str, delay_ticks: u64, task_id: u32);
    fn schedule_repeating(
        &mut self,
        plugin_name: &str,
        delay_ticks: u64,
        interval_ticks: u64,
        task_id: u32,
    );
    fn cancel_task(&mut self, plugin_name: &str, task_id: u32);

    // --- Commands & config ---
    fn register_command(&mut self, name: &str, description: &str, plugin_name: &str);
    /// Persist `config` as the plugin's config file.
    fn save_plugin_config(&mut self, plugin_name: &str, config: serde_json::Value);
    /// Re-read the plugin's config file and hand it back through `Plugin::load_config`.
    fn reload_plugin_config(&mut self, plugin_name: &str);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
