//! Simulated game host: worlds, players, and the plugin bridge.
//!
//! Holds just enough game state for sleeping to mean something: a clock and
//! weather per world, and players with a position, a game mode and a bed.
//! Every state change goes through the plugin manager the same way a real
//! server would route it.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;

use slumber_core::message::strip_colors;
use slumber_core::time;
use slumber_plugin_api::{
    BossBarView, EventResult, GameMode, PluginEvent, PluginPlayer, PluginWorld,
};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::console::{self, ConsoleCommand};
use crate::permissions::{PermissionManager, CONSOLE};
use crate::persistence::LevelData;
use crate::plugin_manager::{PendingAction, PluginManager, ServerSnapshot};

/// Messages kept per player for `list` and inspection.
const INBOX_LIMIT: usize = 64;

const SPAWN: (f32, f32, f32) = (0.5, 64.0, 0.5);

pub struct World {
    pub level: LevelData,
    dir: PathBuf,
}

pub struct OnlinePlayer {
    pub info: PluginPlayer,
    /// Boss bars currently on screen, by id.
    pub bars: BTreeMap<u64, BossBarView>,
    /// Most recent chat lines, colors stripped.
    pub inbox: VecDeque<String>,
}

impl OnlinePlayer {
    fn deliver(&mut self, message: &str) {
        if self.inbox.len() == INBOX_LIMIT {
            self.inbox.pop_front();
        }
        self.inbox.push_back(strip_colors(message));
    }
}

pub struct Host {
    worlds: BTreeMap<String, World>,
    /// Online players in join order.
    players: Vec<OnlinePlayer>,
    permissions: PermissionManager,
    plugin_manager: PluginManager,
    current_tick: u64,
    plugin_started: bool,
    daylight_cycle: bool,
    default_world: String,
    default_gamemode: GameMode,
}

impl Host {
    /// Load (or create) every configured world.
    pub fn new(
        config: &ServerConfig,
        plugin_manager: PluginManager,
        permissions: PermissionManager,
    ) -> Self {
        let root = PathBuf::from(&config.worlds.directory);
        let worlds = config
            .worlds
            .names
            .iter()
            .map(|name| {
                let dir = root.join(name);
                let level = match LevelData::load(&dir) {
                    Some(level) => {
                        info!("Loaded world {name} at time {}", level.time);
                        level
                    }
                    None => {
                        info!("Created world {name}");
                        LevelData::new(config.worlds.start_time)
                    }
                };
                (name.clone(), World { level, dir })
            })
            .collect();
        let default_world = config
            .worlds
            .default_world()
            .unwrap_or_default()
            .to_string();

        Self {
            worlds,
            players: Vec::new(),
            permissions,
            plugin_manager,
            current_tick: 0,
            plugin_started: false,
            daylight_cycle: config.worlds.daylight_cycle,
            default_world,
            default_gamemode: GameMode::parse(&config.server.gamemode),
        }
    }

    /// Enable plugins and apply whatever they request on startup.
    pub fn enable_plugins(&mut self) {
        let snapshot = self.build_snapshot();
        let actions = self.plugin_manager.enable_all(&snapshot);
        self.apply_plugin_actions(actions);
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn player(&self, name: &str) -> Option<&OnlinePlayer> {
        self.players.iter().find(|p| p.info.name == name)
    }

    fn player_mut(&mut self, name: &str) -> Option<&mut OnlinePlayer> {
        self.players.iter_mut().find(|p| p.info.name == name)
    }

    fn world_infos(&self) -> Vec<PluginWorld> {
        self.worlds
            .iter()
            .map(|(name, w)| PluginWorld {
                name: name.clone(),
                time: w.level.time,
                raining: w.level.raining,
                thundering: w.level.thundering,
            })
            .collect()
    }

    /// Build a read-only snapshot of server state for plugin API.
    pub fn build_snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            players: self.players.iter().map(|p| p.info.clone()).collect(),
            worlds: self.world_infos(),
            current_tick: self.current_tick,
            permissions: self.permissions.clone(),
        }
    }

    /// Dispatch an event and apply the resulting actions.
    fn dispatch(&mut self, event: &PluginEvent) -> EventResult {
        let snapshot = self.build_snapshot();
        let (result, actions) = self.plugin_manager.dispatch(event, &snapshot);
        self.apply_plugin_actions(actions);
        result
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    /// Run one game tick (called every 50ms from main loop).
    pub fn game_tick(&mut self) {
        self.current_tick += 1;
        if self.daylight_cycle {
            for world in self.worlds.values_mut() {
                world.level.time += 1;
            }
        }

        // Plugin: dispatch ServerStarted on first tick
        if !self.plugin_started {
            self.plugin_started = true;
            self.dispatch(&PluginEvent::ServerStarted);
        }

        // Plugin scheduler tick
        let actions = {
            let snapshot = self.build_snapshot();
            self.plugin_manager.tick_scheduler(&snapshot)
        };
        self.apply_plugin_actions(actions);

        self.wake_at_dawn();
    }

    /// Get sleepers out of bed once their world is no longer fit to sleep in.
    fn wake_at_dawn(&mut self) {
        let woken: Vec<PluginPlayer> = self
            .players
            .iter_mut()
            .filter(|p| p.info.sleeping)
            .filter(|p| {
                self.worlds
                    .get(&p.info.world)
                    .is_none_or(|w| !can_sleep(&w.level))
            })
            .map(|p| {
                p.info.sleeping = false;
                p.info.clone()
            })
            .collect();
        for player in woken {
            debug!("{} woke up", player.name);
            self.dispatch(&PluginEvent::PlayerBedLeave { player });
        }
    }

    // ─── Plugin actions ─────────────────────────────────────────────────────

    /// Apply deferred plugin actions.
    pub fn apply_plugin_actions(&mut self, actions: Vec<PendingAction>) {
        let actions = self.plugin_manager.apply_internal_actions(actions);
        for action in actions {
            match action {
                PendingAction::SendMessage {
                    player_name,
                    message,
                } => self.send_message(&player_name, &message),
                PendingAction::BroadcastMessage { message } => {
                    info!("[Broadcast] {}", strip_colors(&message));
                    for player in &mut self.players {
                        player.deliver(&message);
                    }
                }
                PendingAction::SetTime { world, time } => match self.worlds.get_mut(&world) {
                    Some(w) => w.level.time = time,
                    None => warn!("Plugin set time in unknown world {world}"),
                },
                PendingAction::SetWeather {
                    world,
                    raining,
                    thundering,
                } => match self.worlds.get_mut(&world) {
                    Some(w) => {
                        w.level.raining = raining;
                        w.level.thundering = thundering;
                    }
                    None => warn!("Plugin set weather in unknown world {world}"),
                },
                PendingAction::SaveWorld { world } => self.save_world(&world),
                PendingAction::ShowBossBar { player_name, bar }
                | PendingAction::UpdateBossBar { player_name, bar } => {
                    if let Some(p) = self.player_mut(&player_name) {
                        p.bars.insert(bar.id, bar);
                    }
                }
                PendingAction::HideBossBar {
                    player_name,
                    bar_id,
                } => {
                    if let Some(p) = self.player_mut(&player_name) {
                        p.bars.remove(&bar_id);
                    }
                }
                PendingAction::PlaySound {
                    world,
                    position,
                    sound,
                    volume,
                    pitch,
                } => debug!("Sound {sound} in {world} at {position:?} (volume {volume}, pitch {pitch})"),
                PendingAction::SpawnParticles {
                    world,
                    position,
                    particle,
                    count,
                } => debug!("{count}x {particle} in {world} at {position:?}"),
                PendingAction::RegisterCommand { .. }
                | PendingAction::ScheduleTask { .. }
                | PendingAction::CancelTask { .. }
                | PendingAction::SavePluginConfig { .. }
                | PendingAction::ReloadPluginConfig { .. } => {
                    // These are handled internally by PluginManager
                }
            }
        }
    }

    fn send_message(&mut self, name: &str, message: &str) {
        if name == CONSOLE {
            for line in strip_colors(message).lines() {
                info!("{line}");
            }
            return;
        }
        match self.player_mut(name) {
            Some(p) => {
                p.deliver(message);
                info!("[-> {name}] {}", strip_colors(message));
            }
            None => debug!("Dropped message for offline player {name}"),
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn save_world(&mut self, name: &str) {
        let Some(world) = self.worlds.get_mut(name) else {
            warn!("Save requested for unknown world {name}");
            return;
        };
        match world.level.save(&world.dir) {
            Ok(()) => info!("Saved world {name}"),
            Err(e) => warn!("Failed to save world {name}: {e}"),
        }
    }

    pub fn save_all(&mut self) {
        let names: Vec<String> = self.worlds.keys().cloned().collect();
        for name in names {
            self.save_world(&name);
        }
    }

    /// Tell plugins the server is stopping, disable them, and save every world.
    pub fn shutdown(&mut self) {
        self.dispatch(&PluginEvent::ServerStopping);
        self.plugin_manager.disable_all();
        self.save_all();
    }

    // ─── Console ────────────────────────────────────────────────────────────

    /// Run one console line. Returns true when the server should stop.
    pub fn handle_console_command(&mut self, line: &str) -> bool {
        let command = match ConsoleCommand::parse(line) {
            Ok(c) => c,
            Err(e) => {
                warn!("{e}");
                return false;
            }
        };

        match command {
            ConsoleCommand::Join {
                name,
                world,
                gamemode,
            } => self.join(name, world, gamemode),
            ConsoleCommand::Quit { name } => self.quit(&name),
            ConsoleCommand::Bed { name } => self.enter_bed(&name),
            ConsoleCommand::Wake { name } => self.leave_bed(&name),
            ConsoleCommand::Move { name, to } => self.move_player(&name, to),
            ConsoleCommand::Interact { name } => {
                if let Some(player) = self.online(&name) {
                    self.dispatch(&PluginEvent::PlayerInteract { player });
                }
            }
            ConsoleCommand::Gamemode { name, gamemode } => match self.player_mut(&name) {
                Some(p) => {
                    p.info.gamemode = gamemode;
                    info!("Set {name}'s game mode to {gamemode:?}");
                }
                None => warn!("{name} is not online"),
            },
            ConsoleCommand::Time { world, time } => self.set_time(&world, time),
            ConsoleCommand::Rain {
                world,
                raining,
                thundering,
            } => self.set_weather(&world, raining, thundering),
            ConsoleCommand::List => self.list(),
            ConsoleCommand::Op { name } => {
                self.permissions.ops.insert(name.clone());
                self.permissions.save_ops();
                info!("Made {name} a server operator");
            }
            ConsoleCommand::Deop { name } => {
                if self.permissions.ops.remove(&name) {
                    self.permissions.save_ops();
                    info!("Made {name} no longer a server operator");
                } else {
                    warn!("{name} is not an operator");
                }
            }
            ConsoleCommand::Complete { args } => {
                let worlds: Vec<String> = self.worlds.keys().cloned().collect();
                let suggestions = slumber_command::tab_complete(&args, &worlds);
                info!("Completions: {}", suggestions.join(", "));
            }
            ConsoleCommand::As {
                name,
                command,
                args,
            } => {
                let Some(player) = self.online(&name) else {
                    return false;
                };
                let event = PluginEvent::PlayerCommand {
                    player,
                    command: command.clone(),
                    args: args.clone(),
                };
                if self.dispatch(&event) == EventResult::Cancelled {
                    return false;
                }
                self.run_plugin_command(&command, &args, &name);
            }
            ConsoleCommand::Plugin { command, args } => {
                self.run_plugin_command(&command, &args, CONSOLE);
            }
            ConsoleCommand::Save => self.save_all(),
            ConsoleCommand::Stop => return true,
            ConsoleCommand::Help => {
                for line in console::help_lines() {
                    info!("{line}");
                }
            }
        }
        false
    }

    fn online(&self, name: &str) -> Option<PluginPlayer> {
        let player = self.player(name).map(|p| p.info.clone());
        if player.is_none() {
            warn!("{name} is not online");
        }
        player
    }

    fn join(&mut self, name: String, world: Option<String>, gamemode: Option<GameMode>) {
        if self.player(&name).is_some() {
            warn!("{name} is already online");
            return;
        }
        let world = world.unwrap_or_else(|| self.default_world.clone());
        if !self.worlds.contains_key(&world) {
            warn!("Unknown world {world}");
            return;
        }
        let player = PluginPlayer {
            name: name.clone(),
            uuid: format!("{:032x}", rand::random::<u128>()),
            world,
            position: SPAWN,
            gamemode: gamemode.unwrap_or(self.default_gamemode),
            sleeping: false,
        };
        info!("{name} joined {} ({:?})", player.world, player.gamemode);
        self.players.push(OnlinePlayer {
            info: player.clone(),
            bars: BTreeMap::new(),
            inbox: VecDeque::new(),
        });
        self.dispatch(&PluginEvent::PlayerJoin { player });
    }

    fn quit(&mut self, name: &str) {
        let Some(index) = self.players.iter().position(|p| p.info.name == name) else {
            warn!("{name} is not online");
            return;
        };
        let player = self.players.remove(index).info;
        info!("{name} left the game");
        self.dispatch(&PluginEvent::PlayerQuit { player });
    }

    fn enter_bed(&mut self, name: &str) {
        let Some(mut player) = self.online(name) else {
            return;
        };
        if player.sleeping {
            return;
        }
        let fit = self
            .worlds
            .get(&player.world)
            .is_some_and(|w| can_sleep(&w.level));
        if !fit {
            self.send_message(name, "You can only sleep at night or during thunderstorms");
            return;
        }

        player.sleeping = true;
        self.set_sleeping(name, true);
        info!("{name} got into bed");
        if self.dispatch(&PluginEvent::PlayerBedEnter { player }) == EventResult::Cancelled {
            self.set_sleeping(name, false);
        }
    }

    fn leave_bed(&mut self, name: &str) {
        let Some(mut player) = self.online(name) else {
            return;
        };
        if !player.sleeping {
            return;
        }
        player.sleeping = false;
        self.set_sleeping(name, false);
        info!("{name} got out of bed");
        self.dispatch(&PluginEvent::PlayerBedLeave { player });
    }

    fn set_sleeping(&mut self, name: &str, sleeping: bool) {
        if let Some(p) = self.player_mut(name) {
            p.info.sleeping = sleeping;
        }
    }

    fn move_player(&mut self, name: &str, to: (f32, f32, f32)) {
        let Some(mut player) = self.online(name) else {
            return;
        };
        let from = player.position;
        player.position = to;
        if let Some(p) = self.player_mut(name) {
            p.info.position = to;
        }
        let event = PluginEvent::PlayerMove { player, from, to };
        if self.dispatch(&event) == EventResult::Cancelled {
            if let Some(p) = self.player_mut(name) {
                p.info.position = from;
            }
        }
    }

    fn set_time(&mut self, world: &str, time: i64) {
        let Some(previous) = self.worlds.get(world).map(|w| w.level.time) else {
            warn!("Unknown world {world}");
            return;
        };
        if let Some(w) = self.worlds.get_mut(world) {
            w.level.time = time;
        }
        let event = PluginEvent::TimeChange {
            world: world.to_string(),
            new_time: time,
        };
        if self.dispatch(&event) == EventResult::Cancelled {
            if let Some(w) = self.worlds.get_mut(world) {
                w.level.time = previous;
            }
            return;
        }
        info!("Set the time in {world} to {time}");
    }

    fn set_weather(&mut self, world: &str, raining: bool, thundering: bool) {
        let Some(previous) = self
            .worlds
            .get(world)
            .map(|w| (w.level.raining, w.level.thundering))
        else {
            warn!("Unknown world {world}");
            return;
        };
        if let Some(w) = self.worlds.get_mut(world) {
            w.level.raining = raining;
            w.level.thundering = thundering;
        }
        let event = PluginEvent::WeatherChange {
            world: world.to_string(),
            raining,
            thundering,
        };
        if self.dispatch(&event) == EventResult::Cancelled {
            if let Some(w) = self.worlds.get_mut(world) {
                (w.level.raining, w.level.thundering) = previous;
            }
        }
    }

    fn list(&self) {
        let mut per_world: HashMap<&str, Vec<&OnlinePlayer>> = HashMap::new();
        for p in &self.players {
            per_world.entry(p.info.world.as_str()).or_default().push(p);
        }
        for (name, world) in &self.worlds {
            let level = &world.level;
            let weather = match (level.raining, level.thundering) {
                (_, true) => "thunder",
                (true, false) => "rain",
                _ => "clear",
            };
            info!(
                "{name}: {} ({}), {weather}",
                time::time_of_day(level.time),
                time::describe(level.time)
            );
            for p in per_world.get(name.as_str()).into_iter().flatten() {
                let bed = if p.info.sleeping { ", in bed" } else { "" };
                let bar = p
                    .bars
                    .values()
                    .map(|b| format!(", bar \"{}\" {:.0}%", strip_colors(&b.title), b.progress * 100.0))
                    .collect::<String>();
                info!("  {} ({:?}{bed}{bar})", p.info.name, p.info.gamemode);
            }
        }
    }

    fn run_plugin_command(&mut self, command: &str, args: &[String], sender: &str) {
        if !self.plugin_manager.plugin_commands.contains_key(command) {
            self.send_message(sender, "Unknown command. Type 'help' for a list.");
            return;
        }
        let (response, actions) = {
            let snapshot = self.build_snapshot();
            self.plugin_manager
                .handle_command(command, args, sender, &snapshot)
        };
        self.apply_plugin_actions(actions);
        if let Some(response) = response {
            self.send_message(sender, &response);
        }
    }
}

/// Beds work at night and during thunderstorms.
fn can_sleep(level: &LevelData) -> bool {
    time::is_night(level.time) || level.thundering
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        LoggingSection, PermissionsSection, PluginsSection, ServerSection, WorldsSection,
    };
    use slumber_plugin::SleepPlugin;

    struct Fixture {
        host: Host,
        root: PathBuf,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.root).ok();
        }
    }

    fn fixture() -> Fixture {
        let root = std::env::temp_dir().join(format!("slumber_host_{}", rand::random::<u64>()));
        let config = ServerConfig {
            server: ServerSection {
                motd: "Test".into(),
                gamemode: "survival".into(),
            },
            worlds: WorldsSection {
                names: vec!["world".into(), "world_nether".into()],
                default: None,
                start_time: 0,
                daylight_cycle: true,
                directory: root.join("worlds").display().to_string(),
            },
            logging: LoggingSection {
                level: "info".into(),
            },
            permissions: PermissionsSection {
                ops: Vec::new(),
                default_nodes: vec!["slumber.stats".into()],
            },
            plugins: PluginsSection {
                directory: root.join("plugins").display().to_string(),
            },
        };

        let plugins_dir = PathBuf::from(&config.plugins.directory);
        let mut plugin_manager = PluginManager::new(&plugins_dir);
        plugin_manager.register(Box::new(SleepPlugin::new(plugins_dir.join("Slumber"))));
        plugin_manager.load_configs();
        let permissions = PermissionManager::load(root.join("ops.json"), &config.permissions);

        let mut host = Host::new(&config, plugin_manager, permissions);
        host.enable_plugins();
        Fixture { host, root }
    }

    fn run_ticks(host: &mut Host, n: u64) {
        for _ in 0..n {
            host.game_tick();
        }
    }

    fn time_in(host: &Host, world: &str) -> i64 {
        host.worlds.get(world).map(|w| w.level.time).unwrap_or_default()
    }

    fn inbox_contains(host: &Host, player: &str, needle: &str) -> bool {
        host.player(player)
            .is_some_and(|p| p.inbox.iter().any(|m| m.contains(needle)))
    }

    #[test]
    fn sleeping_skips_the_night() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("join Alex");
        host.handle_console_command("time world 13000");
        host.handle_console_command("bed Steve");
        assert!(host.player("Steve").is_some_and(|p| p.info.sleeping));

        run_ticks(host, 100);

        assert!(time::is_day(time_in(host, "world")));
        assert!(time_in(host, "world") >= 25000);
        assert!(host.player("Steve").is_some_and(|p| !p.info.sleeping));
        assert!(inbox_contains(host, "Alex", "Good morning"));
        assert!(host.player("Steve").is_some_and(|p| p.bars.is_empty()));
        // auto-save after the skip
        assert!(fx.root.join("worlds").join("world").join("level.json").exists());
    }

    #[test]
    fn bed_is_refused_during_the_day() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("bed Steve");
        assert!(host.player("Steve").is_some_and(|p| !p.info.sleeping));
        assert!(inbox_contains(host, "Steve", "only sleep at night"));
    }

    #[test]
    fn thunder_allows_sleep() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("rain world thunder");
        host.handle_console_command("bed Steve");
        assert!(host.player("Steve").is_some_and(|p| p.info.sleeping));

        run_ticks(host, 100);
        let level = host.worlds.get("world").map(|w| &w.level);
        assert!(level.is_some_and(|l| !l.raining && !l.thundering));
        assert!(time_in(host, "world") >= 1000);
        assert!(host.player("Steve").is_some_and(|p| !p.info.sleeping));
    }

    #[test]
    fn worlds_are_independent() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("join Alex world_nether");
        host.handle_console_command("time world 13000");
        host.handle_console_command("time world_nether 13000");
        host.handle_console_command("bed Steve");

        run_ticks(host, 100);

        assert!(time::is_day(time_in(host, "world")));
        assert!(time::is_night(time_in(host, "world_nether")));
    }

    #[test]
    fn countdown_shows_a_bar() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("time world 13000");
        host.handle_console_command("bed Steve");
        run_ticks(host, 10);
        assert!(host.player("Steve").is_some_and(|p| !p.bars.is_empty()));
    }

    #[test]
    fn waking_early_cancels_the_skip() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("time world 13000");
        host.handle_console_command("bed Steve");
        run_ticks(host, 10);
        host.handle_console_command("wake Steve");
        run_ticks(host, 100);

        assert!(time::is_night(time_in(host, "world")));
        assert!(host.player("Steve").is_some_and(|p| p.bars.is_empty()));
    }

    #[test]
    fn quit_removes_player() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("quit Steve");
        assert!(host.player("Steve").is_none());
    }

    #[test]
    fn unknown_world_join_is_refused() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve the_end");
        assert!(host.player("Steve").is_none());
    }

    #[test]
    fn player_commands_respect_permissions() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("join Steve");
        host.handle_console_command("as Steve sleep stats");
        assert!(inbox_contains(host, "Steve", "Sleep Statistics"));
        assert!(!inbox_contains(host, "Steve", "permission"));

        host.handle_console_command("as Steve sleep skip");
        assert!(inbox_contains(host, "Steve", "permission"));
    }

    #[test]
    fn console_skip_moves_world_to_morning() {
        let mut fx = fixture();
        let host = &mut fx.host;
        host.handle_console_command("time world 18000");
        host.handle_console_command("sleep skip world");
        assert_eq!(time_in(host, "world"), 25000);
    }

    #[test]
    fn stop_returns_true() {
        let mut fx = fixture();
        assert!(fx.host.handle_console_command("stop"));
        assert!(!fx.host.handle_console_command("list"));
    }

    #[test]
    fn shutdown_saves_worlds() {
        let mut fx = fixture();
        fx.host.handle_console_command("time world 5000");
        fx.host.shutdown();
        let saved = LevelData::load(&fx.root.join("worlds").join("world"));
        assert_eq!(saved.map(|l| l.time), Some(5000));
    }
}
