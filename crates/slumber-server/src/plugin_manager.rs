//! Plugin manager: loads, enables, and dispatches events to plugins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use slumber_plugin_api::{
    BossBarView, EventResult, LogLevel, Plugin, PluginEvent, PluginPlayer, PluginWorld, ServerApi,
};
use tracing::{debug, error, info, warn};

use crate::permissions::PermissionManager;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A scheduled task owned by a plugin.
pub struct ScheduledTask {
    pub plugin_name: String,
    pub task_id: u32,
    pub remaining_ticks: u64,
    /// `None` = one-shot, `Some(n)` = repeating every `n` ticks.
    pub interval: Option<u64>,
}

/// Server state snapshot for plugin API reads (built before dispatch).
pub struct ServerSnapshot {
    pub players: Vec<PluginPlayer>,
    pub worlds: Vec<PluginWorld>,
    pub current_tick: u64,
    pub permissions: PermissionManager,
}

/// Deferred side-effect requested by a plugin during a callback.
pub enum PendingAction {
    SendMessage {
        player_name: String,
        message: String,
    },
    BroadcastMessage {
        message: String,
    },
    SetTime {
        world: String,
        time: i64,
    },
    SetWeather {
        world: String,
        raining: bool,
        thundering: bool,
    },
    SaveWorld {
        world: String,
    },
    ShowBossBar {
        player_name: String,
        bar: BossBarView,
    },
    UpdateBossBar {
        player_name: String,
        bar: BossBarView,
    },
    HideBossBar {
        player_name: String,
        bar_id: u64,
    },
    PlaySound {
        world: String,
        position: (f32, f32, f32),
        sound: String,
        volume: f32,
        pitch: f32,
    },
    SpawnParticles {
        world: String,
        position: (f32, f32, f32),
        particle: String,
        count: u32,
    },
    RegisterCommand {
        name: String,
        description: String,
        plugin_name: String,
    },
    ScheduleTask {
        task: ScheduledTask,
    },
    CancelTask {
        plugin_name: String,
        task_id: u32,
    },
    SavePluginConfig {
        plugin_name: String,
        config: serde_json::Value,
    },
    ReloadPluginConfig {
        plugin_name: String,
    },
}

// ─── ServerApiImpl ───────────────────────────────────────────────────────────

/// Implements `ServerApi` using a snapshot for reads and accumulating PendingActions for writes.
struct ServerApiImpl<'a> {
    snapshot: &'a ServerSnapshot,
    actions: Vec<PendingAction>,
}

impl<'a> ServerApiImpl<'a> {
    fn new(snapshot: &'a ServerSnapshot) -> Self {
        Self {
            snapshot,
            actions: Vec::new(),
        }
    }

    fn take_actions(self) -> Vec<PendingAction> {
        self.actions
    }
}

impl ServerApi for ServerApiImpl<'_> {
    fn online_players(&self) -> Vec<PluginPlayer> {
        self.snapshot.players.clone()
    }

    fn get_player(&self, name: &str) -> Option<PluginPlayer> {
        self.snapshot
            .players
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    fn has_permission(&self, name: &str, node: &str) -> bool {
        self.snapshot.permissions.has(name, node)
    }

    fn send_message(&mut self, player_name: &str, message: &str) {
        self.actions.push(PendingAction::SendMessage {
            player_name: player_name.to_string(),
            message: message.to_string(),
        });
    }

    fn broadcast_message(&mut self, message: &str) {
        self.actions.push(PendingAction::BroadcastMessage {
            message: message.to_string(),
        });
    }

    fn worlds(&self) -> Vec<PluginWorld> {
        self.snapshot.worlds.clone()
    }

    fn get_world(&self, name: &str) -> Option<PluginWorld> {
        self.snapshot
            .worlds
            .iter()
            .find(|w| w.name == name)
            .cloned()
    }

    fn set_time(&mut self, world: &str, time: i64) {
        self.actions.push(PendingAction::SetTime {
            world: world.to_string(),
            time,
        });
    }

    fn set_weather(&mut self, world: &str, raining: bool, thundering: bool) {
        self.actions.push(PendingAction::SetWeather {
            world: world.to_string(),
            raining,
            thundering,
        });
    }

    fn save_world(&mut self, world: &str) {
        self.actions.push(PendingAction::SaveWorld {
            world: world.to_string(),
        });
    }

    fn show_boss_bar(&mut self, player_name: &str, bar: &BossBarView) {
        self.actions.push(PendingAction::ShowBossBar {
            player_name: player_name.to_string(),
            bar: bar.clone(),
        });
    }

    fn update_boss_bar(&mut self, player_name: &str, bar: &BossBarView) {
        self.actions.push(PendingAction::UpdateBossBar {
            player_name: player_name.to_string(),
            bar: bar.clone(),
        });
    }

    fn hide_boss_bar(&mut self, player_name: &str, bar_id: u64) {
        self.actions.push(PendingAction::HideBossBar {
            player_name: player_name.to_string(),
            bar_id,
        });
    }

    fn play_sound(
        &mut self,
        world: &str,
        position: (f32, f32, f32),
        sound: &str,
        volume: f32,
        pitch: f32,
    ) {
        self.actions.push(PendingAction::PlaySound {
            world: world.to_string(),
            position,
            sound: sound.to_string(),
            volume,
            pitch,
        });
    }

    fn spawn_particles(
        &mut self,
        world: &str,
        position: (f32, f32, f32),
        particle: &str,
        count: u32,
    ) {
        self.actions.push(PendingAction::SpawnParticles {
            world: world.to_string(),
            position,
            particle: particle.to_string(),
            count,
        });
    }

    fn get_tick(&self) -> u64 {
        self.snapshot.current_tick
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!("[plugin] {message}"),
            LogLevel::Warn => warn!("[plugin] {message}"),
            LogLevel::Error => error!("[plugin] {message}"),
            LogLevel::Debug => debug!("[plugin] {message}"),
        }
    }

    fn schedule_delayed(&mut self, plugin_name: &str, delay_ticks: u64, task_id: u32) {
        self.actions.push(PendingAction::ScheduleTask {
            task: ScheduledTask {
                plugin_name: plugin_name.to_string(),
                task_id,
                remaining_ticks: delay_ticks,
                interval: None,
            },
        });
    }

    fn schedule_repeating(
        &mut self,
        plugin_name: &str,
        delay_ticks: u64,
        interval_ticks: u64,
        task_id: u32,
    ) {
        self.actions.push(PendingAction::ScheduleTask {
            task: ScheduledTask {
                plugin_name: plugin_name.to_string(),
                task_id,
                remaining_ticks: delay_ticks,
                interval: Some(interval_ticks),
            },
        });
    }

    fn cancel_task(&mut self, plugin_name: &str, task_id: u32) {
        self.actions.push(PendingAction::CancelTask {
            plugin_name: plugin_name.to_string(),
            task_id,
        });
    }

    fn register_command(&mut self, name: &str, description: &str, plugin_name: &str) {
        self.actions.push(PendingAction::RegisterCommand {
            name: name.to_string(),
            description: description.to_string(),
            plugin_name: plugin_name.to_string(),
        });
    }

    fn save_plugin_config(&mut self, plugin_name: &str, config: serde_json::Value) {
        self.actions.push(PendingAction::SavePluginConfig {
            plugin_name: plugin_name.to_string(),
            config,
        });
    }

    fn reload_plugin_config(&mut self, plugin_name: &str) {
        self.actions.push(PendingAction::ReloadPluginConfig {
            plugin_name: plugin_name.to_string(),
        });
    }
}

// ─── PluginManager ───────────────────────────────────────────────────────────

/// Manages all loaded plugins, their scheduled tasks, and command registrations.
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
    tasks: Vec<ScheduledTask>,
    /// Commands registered by plugins: command_name → (plugin_name, description).
    pub plugin_commands: HashMap<String, (String, String)>,
    /// Root of the per-plugin config directories.
    config_root: PathBuf,
}

impl PluginManager {
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            plugins: Vec::new(),
            tasks: Vec::new(),
            plugin_commands: HashMap::new(),
            config_root: config_root.into(),
        }
    }

    /// Directory a plugin keeps its files in.
    pub fn plugin_dir(&self, plugin_name: &str) -> PathBuf {
        self.config_root.join(plugin_name)
    }

    /// Register a plugin (call before enable_all).
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        info!("Registered plugin: {}", plugin.info().name);
        self.plugins.push(plugin);
    }

    /// Enable all registered plugins. Returns the actions meant for the host.
    pub fn enable_all(&mut self, snapshot: &ServerSnapshot) -> Vec<PendingAction> {
        let mut all_actions = Vec::new();
        for plugin in &mut self.plugins {
            let mut api = ServerApiImpl::new(snapshot);
            plugin.on_enable(&mut api);
            all_actions.extend(api.take_actions());
        }
        self.apply_internal_actions(all_actions)
    }

    /// Disable all registered plugins.
    pub fn disable_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.on_disable();
        }
    }

    /// Dispatch an event to all plugins. Returns the combined result and pending actions.
    pub fn dispatch(
        &mut self,
        event: &PluginEvent,
        snapshot: &ServerSnapshot,
    ) -> (EventResult, Vec<PendingAction>) {
        let cancellable = event.is_cancellable();
        let mut all_actions = Vec::new();
        let mut final_result = EventResult::Continue;

        for plugin in &mut self.plugins {
            let mut api = ServerApiImpl::new(snapshot);
            let result = plugin.on_event(event, &mut api);
            all_actions.extend(api.take_actions());

            if cancellable && result == EventResult::Cancelled {
                final_result = EventResult::Cancelled;
                break; // Stop propagation
            }
        }

        (final_result, all_actions)
    }

    /// Tick the scheduler. Returns pending actions from fired tasks.
    pub fn tick_scheduler(&mut self, snapshot: &ServerSnapshot) -> Vec<PendingAction> {
        let mut all_actions = Vec::new();
        let mut fired: Vec<(String, u32)> = Vec::new();

        // Decrement and collect fired tasks
        for task in &mut self.tasks {
            if task.remaining_ticks > 0 {
                task.remaining_ticks -= 1;
            }
            if task.remaining_ticks == 0 {
                fired.push((task.plugin_name.clone(), task.task_id));
                if let Some(interval) = task.interval {
                    task.remaining_ticks = interval;
                }
            }
        }

        // Remove one-shot tasks that fired
        self.tasks
            .retain(|t| t.remaining_ticks > 0 || t.interval.is_some());

        for (plugin_name, task_id) in fired {
            if let Some(plugin) = self
                .plugins
                .iter_mut()
                .find(|p| p.info().name == plugin_name)
            {
                let mut api = ServerApiImpl::new(snapshot);
                plugin.on_task(task_id, &mut api);
                all_actions.extend(api.take_actions());
            }
        }

        all_actions
    }

    /// Handle a plugin-registered command. Returns (response_message, pending_actions).
    pub fn handle_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: &str,
        snapshot: &ServerSnapshot,
    ) -> (Option<String>, Vec<PendingAction>) {
        let plugin_name = match self.plugin_commands.get(command) {
            Some((name, _)) => name.clone(),
            None => return (None, Vec::new()),
        };

        if let Some(plugin) = self
            .plugins
            .iter_mut()
            .find(|p| p.info().name == plugin_name)
        {
            let mut api = ServerApiImpl::new(snapshot);
            let response = plugin.on_command(command, args, sender, &mut api);
            (response, api.take_actions())
        } else {
            (None, Vec::new())
        }
    }

    /// Load configs for all plugins from disk, writing defaults where missing.
    pub fn load_configs(&mut self) {
        let root = self.config_root.clone();
        for plugin in &mut self.plugins {
            load_plugin_config(plugin.as_mut(), &root);
        }
    }

    /// Re-read one plugin's config file.
    pub fn reload_config(&mut self, plugin_name: &str) {
        let root = self.config_root.clone();
        match self
            .plugins
            .iter_mut()
            .find(|p| p.info().name == plugin_name)
        {
            Some(plugin) => {
                load_plugin_config(plugin.as_mut(), &root);
                info!("Reloaded config for {plugin_name}");
            }
            None => warn!("Config reload for unknown plugin {plugin_name}"),
        }
    }

    /// Write a plugin's config file.
    pub fn save_config(&self, plugin_name: &str, config: &serde_json::Value) {
        let dir = self.plugin_dir(plugin_name);
        if let Err(e) = write_config(&dir, config) {
            warn!("Failed to save config for {plugin_name}: {e}");
        }
    }

    /// Apply plugin-manager actions (commands, tasks, configs) and hand
    /// the rest back for the host to apply.
    pub fn apply_internal_actions(&mut self, actions: Vec<PendingAction>) -> Vec<PendingAction> {
        let mut host_actions = Vec::new();
        for action in actions {
            match action {
                PendingAction::RegisterCommand {
                    name,
                    description,
                    plugin_name,
                } => {
                    self.plugin_commands.insert(name, (plugin_name, description));
                }
                PendingAction::ScheduleTask { task } => {
                    self.tasks.push(task);
                }
                PendingAction::CancelTask {
                    plugin_name,
                    task_id,
                } => {
                    self.tasks
                        .retain(|t| !(t.plugin_name == plugin_name && t.task_id == task_id));
                }
                PendingAction::SavePluginConfig {
                    plugin_name,
                    config,
                } => self.save_config(&plugin_name, &config),
                PendingAction::ReloadPluginConfig { plugin_name } => {
                    self.reload_config(&plugin_name)
                }
                other => host_actions.push(other),
            }
        }
        host_actions
    }
}

fn write_config(dir: &Path, config: &serde_json::Value) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(dir.join("config.json"), json)
}

fn load_plugin_config(plugin: &mut dyn Plugin, root: &Path) {
    let info = plugin.info();
    let Some(default_config) = plugin.default_config() else {
        return;
    };
    let plugin_dir = root.join(&info.name);
    let config_path = plugin_dir.join("config.json");

    let config = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to parse config for {}: {e}", info.name);
                    default_config
                }
            },
            Err(e) => {
                warn!("Failed to read config for {}: {e}", info.name);
                default_config
            }
        }
    } else {
        // Write default config
        if let Err(e) = write_config(&plugin_dir, &default_config) {
            warn!("Failed to write default config for {}: {e}", info.name);
        }
        default_config
    };

    plugin.load_config(config);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
