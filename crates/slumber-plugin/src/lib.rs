//! Slumber as a host plugin.
//!
//! Bridges the host's [`Plugin`] callbacks to the sleep engine: events and
//! scheduler ticks become [`SleepEvents`] calls, and the [`SleepEffect`]s
//! that come back are flushed through the [`ServerApi`].

pub mod update;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use slumber_command::{CommandContext, SleepCommand, COMMAND_NAME};
use slumber_core::message::colorize;
use slumber_core::time::ticks_to_millis;
use slumber_core::{SleepConfig, SleepEffect, SleepEngine, SleepEvents, SleepStatistics, Snapshot};
use slumber_plugin_api::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::update::UpdateStatus;

pub const PLUGIN_NAME: &str = "Slumber";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const STATS_FILE: &str = "statistics.toml";
/// Players holding this node hear about new releases when they join.
pub const UPDATE_NOTIFY_PERMISSION: &str = "slumber.update";

const TICK_TASK: u32 = 1;
const FIRST_SAVE_TASK: u32 = 1000;

// ─── Plugin state ────────────────────────────────────────────────────────────

pub struct SleepPlugin {
    engine: SleepEngine,
    data_dir: PathBuf,
    updates: Option<mpsc::UnboundedReceiver<UpdateStatus>>,
    latest_release: Option<String>,
    /// Auto-save tasks in flight: task id → world.
    pending_saves: HashMap<u32, String>,
    next_task_id: u32,
    /// Effects produced outside a callback that carries a `ServerApi`.
    deferred: Vec<SleepEffect>,
}

impl SleepPlugin {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: SleepEngine::new(SleepConfig::default()),
            data_dir: data_dir.into(),
            updates: None,
            latest_release: None,
            pending_saves: HashMap::new(),
            next_task_id: FIRST_SAVE_TASK,
            deferred: Vec::new(),
        }
    }

    pub fn engine(&self) -> &SleepEngine {
        &self.engine
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(STATS_FILE)
    }

    /// Newest release seen by the update check, if it is ahead of us.
    pub fn latest_release(&self) -> Option<&str> {
        self.latest_release.as_deref()
    }

    fn snapshot(api: &dyn ServerApi) -> Snapshot {
        Snapshot {
            worlds: api.worlds(),
            players: api.online_players(),
        }
    }

    /// Engine time: server ticks in milliseconds.
    fn now(api: &dyn ServerApi) -> u64 {
        ticks_to_millis(api.get_tick())
    }

    fn alloc_task_id(&mut self) -> u32 {
        let id = self.next_task_id;
        self.next_task_id = self.next_task_id.wrapping_add(1).max(FIRST_SAVE_TASK);
        id
    }

    /// Forward engine effects to the host, colorizing text on the way.
    fn apply(&mut self, effects: Vec<SleepEffect>, api: &mut dyn ServerApi) {
        for effect in effects {
            match effect {
                SleepEffect::Broadcast { message } => api.broadcast_message(&colorize(&message)),
                SleepEffect::Message { player, message } => {
                    api.send_message(&player, &colorize(&message))
                }
                SleepEffect::SetTime { world, time } => api.set_time(&world, time),
                SleepEffect::ClearWeather { world } => api.set_weather(&world, false, false),
                SleepEffect::ShowBar { player, mut bar } => {
                    bar.title = colorize(&bar.title);
                    api.show_boss_bar(&player, &bar);
                }
                SleepEffect::UpdateBar { player, mut bar } => {
                    bar.title = colorize(&bar.title);
                    api.update_boss_bar(&player, &bar);
                }
                SleepEffect::HideBar { player, bar_id } => api.hide_boss_bar(&player, bar_id),
                SleepEffect::PlaySound {
                    world,
                    position,
                    sound,
                    volume,
                    pitch,
                } => api.play_sound(&world, position, sound, volume, pitch),
                SleepEffect::SpawnParticles {
                    world,
                    position,
                    particle,
                    count,
                } => api.spawn_particles(&world, scatter(position), particle, count),
                SleepEffect::ScheduleSave { world, delay_ticks } => {
                    let id = self.alloc_task_id();
                    self.pending_saves.insert(id, world);
                    api.schedule_delayed(PLUGIN_NAME, delay_ticks, id);
                }
            }
        }
    }

    fn start_update_check(&mut self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let repository = self.engine.config().update_checker.repository.clone();
        match update::spawn_check(repository, VERSION.to_string(), tx) {
            Ok(()) => self.updates = Some(rx),
            Err(e) => warn!("Update check skipped: {e}"),
        }
    }

    fn drain_updates(&mut self) {
        let Some(rx) = self.updates.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(UpdateStatus::Available { current, latest }) => {
                warn!("A new version of {PLUGIN_NAME} is available: {latest} (running {current})");
                self.latest_release = Some(latest);
                self.updates = None;
            }
            Ok(UpdateStatus::UpToDate { current }) => {
                info!("{PLUGIN_NAME} {current} is up to date");
                self.updates = None;
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => self.updates = None,
        }
    }

    fn save_statistics(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let path = self.stats_path();
        match self.engine.statistics().save(&path, now) {
            Ok(()) => debug!("Saved sleep statistics to {}", path.display()),
            Err(e) => warn!("Failed to save sleep statistics: {e}"),
        }
    }

    fn load_statistics(&mut self, path: &Path) {
        self.engine
            .set_statistics(SleepStatistics::load_or_default(path));
    }
}

/// Jitter a particle burst so repeated bursts don't stack on one point.
fn scatter(position: (f32, f32, f32)) -> (f32, f32, f32) {
    let mut rng = rand::thread_rng();
    (
        position.0 + rng.gen_range(-0.5..0.5),
        position.1 + rng.gen_range(0.0..0.5),
        position.2 + rng.gen_range(-0.5..0.5),
    )
}

// ─── Plugin impl ─────────────────────────────────────────────────────────────

impl Plugin for SleepPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.into(),
            version: VERSION.into(),
            description: "Lets a single sleeper, or a share of the server, skip the night".into(),
            author: "Slumber contributors".into(),
        }
    }

    fn on_enable(&mut self, api: &mut dyn ServerApi) {
        api.register_command(COMMAND_NAME, "Sleep management commands", PLUGIN_NAME);
        let path = self.stats_path();
        self.load_statistics(&path);
        api.schedule_repeating(PLUGIN_NAME, 1, 1, TICK_TASK);
        if self.engine.config().update_checker.enabled {
            self.start_update_check();
        }
        info!("{PLUGIN_NAME} {VERSION} enabled");
    }

    fn on_disable(&mut self) {
        self.save_statistics();
        info!("{PLUGIN_NAME} disabled");
    }

    fn on_event(&mut self, event: &PluginEvent, api: &mut dyn ServerApi) -> EventResult {
        let now = Self::now(api);
        let effects = match event {
            PluginEvent::PlayerJoin { player } => {
                if let Some(latest) = &self.latest_release {
                    if api.has_permission(&player.name, UPDATE_NOTIFY_PERMISSION) {
                        api.send_message(
                            &player.name,
                            &colorize(&format!(
                                "&eA new version of {PLUGIN_NAME} is available: &f{latest}"
                            )),
                        );
                    }
                }
                self.engine.on_player_join(player, now)
            }
            PluginEvent::PlayerQuit { player } => {
                let snapshot = Self::snapshot(api);
                self.engine.on_player_quit(player, &snapshot, now)
            }
            PluginEvent::PlayerMove { player, from, to } => {
                self.engine.on_player_move(player, *from, *to, now)
            }
            PluginEvent::PlayerInteract { player } | PluginEvent::PlayerCommand { player, .. } => {
                self.engine.on_player_interact(player, now)
            }
            PluginEvent::PlayerBedEnter { player } => {
                let snapshot = Self::snapshot(api);
                self.engine.on_bed_enter(player, &snapshot, now)
            }
            PluginEvent::PlayerBedLeave { player } => {
                let snapshot = Self::snapshot(api);
                self.engine.on_bed_leave(player, &snapshot, now)
            }
            PluginEvent::ServerStopping => {
                self.save_statistics();
                Vec::new()
            }
            PluginEvent::WeatherChange { .. }
            | PluginEvent::TimeChange { .. }
            | PluginEvent::ServerStarted => Vec::new(),
        };
        self.apply(effects, api);
        EventResult::Continue
    }

    fn on_task(&mut self, task_id: u32, api: &mut dyn ServerApi) {
        if task_id == TICK_TASK {
            self.drain_updates();
            let mut effects = std::mem::take(&mut self.deferred);
            let snapshot = Self::snapshot(api);
            effects.extend(self.engine.on_tick(&snapshot, Self::now(api)));
            self.apply(effects, api);
        } else if let Some(world) = self.pending_saves.remove(&task_id) {
            debug!("Auto-saving {world} after night skip");
            api.save_world(&world);
        }
    }

    fn on_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: &str,
        api: &mut dyn ServerApi,
    ) -> Option<String> {
        if command != COMMAND_NAME {
            return None;
        }
        let parsed = match SleepCommand::parse(args) {
            Ok(cmd) => cmd,
            Err(e) => return Some(colorize(&e.to_string())),
        };
        if let Some(node) = parsed.permission() {
            if !api.has_permission(sender, node) {
                return Some(colorize(&self.engine.config().message("no-permission")));
            }
        }

        let ctx = CommandContext {
            sender_name: sender.to_string(),
            sender_world: api.get_player(sender).map(|p| p.world),
            args: args.to_vec(),
        };
        let snapshot = Self::snapshot(api);
        let (result, effects) = self.engine.execute(&parsed, &ctx, &snapshot, Self::now(api));
        self.apply(effects, api);

        match parsed {
            SleepCommand::Reload => api.reload_plugin_config(PLUGIN_NAME),
            SleepCommand::Debug => {
                api.save_plugin_config(PLUGIN_NAME, self.engine.config().to_json())
            }
            _ => {}
        }
        if let Some(message) = &result.broadcast {
            api.broadcast_message(&colorize(message));
        }
        if result.messages.is_empty() {
            return None;
        }
        Some(
            result
                .messages
                .iter()
                .map(|m| colorize(m))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn default_config(&self) -> Option<serde_json::Value> {
        Some(SleepConfig::default().to_json())
    }

    fn load_config(&mut self, config: serde_json::Value) {
        let config = SleepConfig::from_json(config);
        let effects = self.engine.apply_config(config);
        self.deferred.extend(effects);
        debug!("{PLUGIN_NAME} configuration loaded");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockApi {
        tick: u64,
        players: Vec<PluginPlayer>,
        worlds: Vec<PluginWorld>,
        denied: Vec<String>,
        messages: Vec<(String, String)>,
        broadcasts: Vec<String>,
        times: Vec<(String, i64)>,
        weather: Vec<(String, bool, bool)>,
        saved_worlds: Vec<String>,
        bars: HashMap<String, BossBarView>,
        particles: u32,
        sounds: u32,
        delayed: Vec<(u64, u32)>,
        repeating: Vec<u32>,
        commands: Vec<String>,
        saved_config: Option<serde_json::Value>,
        reloads: u32,
    }

    impl ServerApi for MockApi {
        fn online_players(&self) -> Vec<PluginPlayer> {
            self.players.clone()
        }
        fn get_player(&self, name: &str) -> Option<PluginPlayer> {
            self.players.iter().find(|p| p.name == name).cloned()
        }
        fn has_permission(&self, name: &str, _node: &str) -> bool {
            !self.denied.iter().any(|d| d == name)
        }
        fn send_message(&mut self, player_name: &str, message: &str) {
            self.messages.push((player_name.into(), message.into()));
        }
        fn broadcast_message(&mut self, message: &str) {
            self.broadcasts.push(message.into());
        }
        fn worlds(&self) -> Vec<PluginWorld> {
            self.worlds.clone()
        }
        fn get_world(&self, name: &str) -> Option<PluginWorld> {
            self.worlds.iter().find(|w| w.name == name).cloned()
        }
        fn set_time(&mut self, world: &str, time: i64) {
            self.times.push((world.into(), time));
        }
        fn set_weather(&mut self, world: &str, raining: bool, thundering: bool) {
            self.weather.push((world.into(), raining, thundering));
        }
        fn save_world(&mut self, world: &str) {
            self.saved_worlds.push(world.into());
        }
        fn show_boss_bar(&mut self, player_name: &str, bar: &BossBarView) {
            self.bars.insert(player_name.into(), bar.clone());
        }
        fn update_boss_bar(&mut self, player_name: &str, bar: &BossBarView) {
            self.bars.insert(player_name.into(), bar.clone());
        }
        fn hide_boss_bar(&mut self, player_name: &str, _bar_id: u64) {
            self.bars.remove(player_name);
        }
        fn play_sound(&mut self, _: &str, _: (f32, f32, f32), _: &str, _: f32, _: f32) {
            self.sounds += 1;
        }
        fn spawn_particles(&mut self, _: &str, _: (f32, f32, f32), _: &str, count: u32) {
            self.particles += count;
        }
        fn get_tick(&self) -> u64 {
            self.tick
        }
        fn log(&self, _level: LogLevel, _message: &str) {}
        fn schedule_delayed(&mut self, _plugin_name: &str, delay_ticks: u64, task_id: u32) {
            self.delayed.push((delay_ticks, task_id));
        }
        fn schedule_repeating(&mut self, _: &str, _: u64, _: u64, task_id: u32) {
            self.repeating.push(task_id);
        }
        fn cancel_task(&mut self, _plugin_name: &str, _task_id: u32) {}
        fn register_command(&mut self, name: &str, _description: &str, _plugin_name: &str) {
            self.commands.push(name.into());
        }
        fn save_plugin_config(&mut self, _plugin_name: &str, config: serde_json::Value) {
            self.saved_config = Some(config);
        }
        fn reload_plugin_config(&mut self, _plugin_name: &str) {
            self.reloads += 1;
        }
    }

    fn steve(sleeping: bool) -> PluginPlayer {
        PluginPlayer {
            name: "Steve".into(),
            uuid: "uuid-steve".into(),
            world: "world".into(),
            position: (10.0, 64.0, -3.0),
            gamemode: GameMode::Survival,
            sleeping,
        }
    }

    fn night_api() -> MockApi {
        MockApi {
            players: vec![steve(false)],
            worlds: vec![PluginWorld {
                name: "world".into(),
                time: 14000,
                raining: true,
                thundering: true,
            }],
            ..Default::default()
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slumber-plugin-{tag}-{}", std::process::id()))
    }

    fn plugin(tag: &str) -> SleepPlugin {
        let mut plugin = SleepPlugin::new(temp_dir(tag));
        plugin.load_config(serde_json::json!({ "update-checker": { "enabled": false } }));
        plugin
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn enable_registers_command_and_tick_task() {
        let mut plugin = plugin("enable");
        let mut api = night_api();
        plugin.on_enable(&mut api);
        assert_eq!(api.commands, vec!["sleep"]);
        assert_eq!(api.repeating, vec![TICK_TASK]);
    }

    #[test]
    fn bed_enter_broadcasts_colorized_message() {
        let mut plugin = plugin("bed");
        let mut api = night_api();
        plugin.on_enable(&mut api);

        api.players = vec![steve(true)];
        plugin.on_event(&PluginEvent::PlayerBedEnter { player: steve(true) }, &mut api);
        assert_eq!(api.broadcasts, vec!["§eSteve is sleeping. Sweet dreams!"]);
        assert!(api.bars["Steve"].title.starts_with("§6"));
        assert!(api.sounds > 0);
        assert!(api.particles > 0);
    }

    #[test]
    fn tick_task_skips_the_night_and_schedules_save() {
        let mut plugin = plugin("skip");
        let mut api = night_api();
        plugin.on_enable(&mut api);
        api.players = vec![steve(true)];
        plugin.on_event(&PluginEvent::PlayerBedEnter { player: steve(true) }, &mut api);

        api.tick = 65;
        plugin.on_task(TICK_TASK, &mut api);
        assert_eq!(api.times, vec![("world".to_string(), 25000)]);
        assert_eq!(api.weather, vec![("world".to_string(), false, false)]);
        assert!(api.bars.is_empty());
        assert_eq!(
            api.broadcasts.last().map(String::as_str),
            Some("§6Good morning! The night has been skipped.")
        );

        let (delay, save_task) = api.delayed[0];
        assert_eq!(delay, 10);
        plugin.on_task(save_task, &mut api);
        assert_eq!(api.saved_worlds, vec!["world"]);
        plugin.on_task(save_task, &mut api);
        assert_eq!(api.saved_worlds.len(), 1);
    }

    #[test]
    fn command_without_permission_is_refused() {
        let mut plugin = plugin("perm");
        let mut api = night_api();
        api.denied.push("Steve".into());
        let reply = plugin.on_command("sleep", &args(&["skip"]), "Steve", &mut api);
        assert_eq!(reply.as_deref(), Some("§cYou don't have permission to do that."));
        assert!(api.times.is_empty());
    }

    #[test]
    fn help_needs_no_permission() {
        let mut plugin = plugin("help");
        let mut api = night_api();
        api.denied.push("Steve".into());
        let reply = plugin.on_command("sleep", &[], "Steve", &mut api).unwrap();
        assert!(reply.starts_with("§6=== Slumber Commands ==="));
        assert_eq!(reply.lines().count(), 7);
    }

    #[test]
    fn skip_command_uses_sender_world() {
        let mut plugin = plugin("manual");
        let mut api = night_api();
        let reply = plugin.on_command("sleep", &args(&["skip"]), "Steve", &mut api);
        assert_eq!(reply, None);
        assert_eq!(api.times, vec![("world".to_string(), 25000)]);
        assert_eq!(api.broadcasts, vec!["§6Steve manually skipped the night!"]);
        assert_eq!(plugin.engine().statistics().manual_skips(), 1);
    }

    #[test]
    fn usage_error_is_reported() {
        let mut plugin = plugin("usage");
        let mut api = night_api();
        let reply = plugin.on_command("sleep", &args(&["cooldown", "reset"]), "CONSOLE", &mut api);
        assert_eq!(
            reply.as_deref(),
            Some("§cInvalid action 'reset'. Use 'clear' or 'check'.")
        );
    }

    #[test]
    fn debug_persists_and_reload_rereads_config() {
        let mut plugin = plugin("debug");
        let mut api = night_api();
        plugin.on_command("sleep", &args(&["debug"]), "CONSOLE", &mut api);
        let saved = api.saved_config.clone().unwrap();
        assert_eq!(saved["debug-mode"], serde_json::Value::Bool(true));

        plugin.on_command("sleep", &args(&["reload"]), "CONSOLE", &mut api);
        assert_eq!(api.reloads, 1);
    }

    #[test]
    fn other_commands_are_ignored() {
        let mut plugin = plugin("other");
        let mut api = night_api();
        assert_eq!(plugin.on_command("home", &[], "Steve", &mut api), None);
    }

    #[test]
    fn disabling_bars_on_reload_hides_them_next_tick() {
        let mut plugin = SleepPlugin::new(temp_dir("bars"));
        plugin.load_config(serde_json::json!({
            "update-checker": { "enabled": false },
            "percentage-mode": true,
            "sleep-percentage": 100
        }));
        let mut api = night_api();
        let mut alex = steve(false);
        alex.name = "Alex".into();
        alex.uuid = "uuid-alex".into();
        api.players = vec![steve(true), alex];
        plugin.on_event(&PluginEvent::PlayerBedEnter { player: steve(true) }, &mut api);
        assert_eq!(api.bars.len(), 2);

        plugin.load_config(serde_json::json!({
            "update-checker": { "enabled": false },
            "boss-bar": { "enabled": false }
        }));
        plugin.on_task(TICK_TASK, &mut api);
        assert!(api.bars.is_empty());
    }

    #[test]
    fn statistics_survive_restart() {
        let dir = temp_dir("stats");
        let _ = std::fs::remove_dir_all(&dir);

        let mut first = SleepPlugin::new(&dir);
        first.load_config(serde_json::json!({ "update-checker": { "enabled": false } }));
        let mut api = night_api();
        first.on_enable(&mut api);
        api.players = vec![steve(true)];
        first.on_event(&PluginEvent::PlayerBedEnter { player: steve(true) }, &mut api);
        first.on_disable();

        let mut second = SleepPlugin::new(&dir);
        second.load_config(serde_json::json!({ "update-checker": { "enabled": false } }));
        second.on_enable(&mut night_api());
        assert_eq!(second.engine().statistics().player_count("Steve"), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_config_round_trips() {
        let plugin = SleepPlugin::new(temp_dir("defaults"));
        let json = plugin.default_config().unwrap();
        assert_eq!(json["sleep-delay-ticks"], serde_json::json!(65));
        assert_eq!(SleepConfig::from_json(json).cooldown_seconds, 30);
    }

    #[test]
    fn update_check_without_runtime_is_skipped() {
        let mut plugin = SleepPlugin::new(temp_dir("update"));
        let mut api = night_api();
        plugin.on_enable(&mut api);
        plugin.on_task(TICK_TASK, &mut api);
        assert_eq!(plugin.latest_release(), None);
    }
}
