//! The sleep engine: shared context for every component, driven by host events.

use slumber_command::{help_lines, CommandContext, CommandResult, CooldownAction, SleepCommand};
use slumber_plugin_api::{PluginPlayer, PluginWorld};
use tracing::{debug, info};

use crate::afk::AfkDetector;
use crate::bossbar::ProgressBars;
use crate::config::SleepConfig;
use crate::cooldown::CooldownTracker;
use crate::coordinator::{required_sleepers, SleepCoordinator};
use crate::effect::{particle_count, SleepEffect};
use crate::message::render;
use crate::stats::SleepStatistics;
use crate::time;

/// Players and worlds as the host sees them right now.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub worlds: Vec<PluginWorld>,
    pub players: Vec<PluginPlayer>,
}

impl Snapshot {
    pub fn world(&self, name: &str) -> Option<&PluginWorld> {
        self.worlds.iter().find(|w| w.name == name)
    }

    pub fn players_in<'a>(&'a self, world: &'a str) -> impl Iterator<Item = &'a PluginPlayer> {
        self.players.iter().filter(move |p| p.world == world)
    }

    pub fn world_names(&self) -> Vec<String> {
        self.worlds.iter().map(|w| w.name.clone()).collect()
    }
}

/// Host events the engine reacts to, one method per kind.
///
/// The `player` passed in carries the state *after* the event: sleeping for
/// a bed enter, awake for a bed leave. The snapshot may lag behind by that
/// one player; the engine corrects for it.
pub trait SleepEvents {
    fn on_player_join(&mut self, player: &PluginPlayer, now: u64) -> Vec<SleepEffect>;
    fn on_player_quit(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect>;
    fn on_bed_enter(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect>;
    fn on_bed_leave(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect>;
    fn on_player_move(
        &mut self,
        player: &PluginPlayer,
        from: (f32, f32, f32),
        to: (f32, f32, f32),
        now: u64,
    ) -> Vec<SleepEffect>;
    fn on_player_interact(&mut self, player: &PluginPlayer, now: u64) -> Vec<SleepEffect>;
    /// Called once per server tick.
    fn on_tick(&mut self, snapshot: &Snapshot, now: u64) -> Vec<SleepEffect>;
}

/// How the event's player differs from the snapshot.
#[derive(Clone, Copy)]
enum Change<'a> {
    Unchanged,
    Upsert(&'a PluginPlayer),
    Remove(&'a str),
}

/// Headcount of one world.
struct Roster {
    members: Vec<PluginPlayer>,
    eligible: usize,
    sleeping: usize,
}

impl Roster {
    fn first_sleeper(&self) -> Option<&PluginPlayer> {
        self.members.iter().find(|p| p.sleeping)
    }
}

pub struct SleepEngine {
    config: SleepConfig,
    coordinator: SleepCoordinator,
    cooldowns: CooldownTracker,
    afk: AfkDetector,
    bars: ProgressBars,
    stats: SleepStatistics,
    ticks: u64,
}

impl SleepEngine {
    pub fn new(config: SleepConfig) -> Self {
        let cooldowns = CooldownTracker::new(config.cooldown_ms());
        Self {
            config,
            coordinator: SleepCoordinator::new(),
            cooldowns,
            afk: AfkDetector::new(),
            bars: ProgressBars::new(),
            stats: SleepStatistics::new(),
            ticks: 0,
        }
    }

    pub fn config(&self) -> &SleepConfig {
        &self.config
    }

    /// Swap in a new config. Bars are taken down if they were switched off.
    pub fn apply_config(&mut self, config: SleepConfig) -> Vec<SleepEffect> {
        self.cooldowns.set_duration(config.cooldown_ms());
        self.config = config;
        self.debug_log("Configuration applied");
        if self.config.boss_bar.enabled {
            Vec::new()
        } else {
            self.bars.hide_all()
        }
    }

    pub fn coordinator(&self) -> &SleepCoordinator {
        &self.coordinator
    }

    pub fn cooldowns_mut(&mut self) -> &mut CooldownTracker {
        &mut self.cooldowns
    }

    pub fn afk(&self) -> &AfkDetector {
        &self.afk
    }

    pub fn bars(&self) -> &ProgressBars {
        &self.bars
    }

    pub fn statistics(&self) -> &SleepStatistics {
        &self.stats
    }

    pub fn set_statistics(&mut self, stats: SleepStatistics) {
        self.stats = stats;
    }

    /// AFK as far as sleeping is concerned. Always false with detection off.
    pub fn is_afk(&self, uuid: &str, now: u64) -> bool {
        self.config.afk.enabled && self.afk.is_afk(uuid, now, self.config.afk_timeout_ms())
    }

    fn is_eligible(&self, player: &PluginPlayer, now: u64) -> bool {
        player.gamemode.counts_for_sleep()
            && !(self.config.afk.ignore_afk_players && self.is_afk(&player.uuid, now))
    }

    fn required(&self, eligible: usize) -> usize {
        if self.config.percentage_mode {
            required_sleepers(eligible, self.config.sleep_percentage)
        } else {
            1
        }
    }

    fn debug_log(&self, message: &str) {
        if self.config.debug_mode {
            info!("[debug] {message}");
        } else {
            debug!("{message}");
        }
    }

    fn roster(&self, snapshot: &Snapshot, world: &str, change: Change<'_>, now: u64) -> Roster {
        let mut members: Vec<PluginPlayer> = snapshot
            .players_in(world)
            .filter(|p| match change {
                Change::Unchanged => true,
                Change::Upsert(changed) => p.uuid != changed.uuid,
                Change::Remove(uuid) => p.uuid != uuid,
            })
            .cloned()
            .collect();
        if let Change::Upsert(changed) = change {
            if changed.world == world {
                members.push(changed.clone());
            }
        }
        // Sleepers lie still, so one can turn AFK in bed and drop out of
        // both counts.
        let eligible = members.iter().filter(|p| self.is_eligible(p, now)).count();
        let sleeping = members
            .iter()
            .filter(|p| p.sleeping && self.is_eligible(p, now))
            .count();
        Roster {
            members,
            eligible,
            sleeping,
        }
    }

    // ─── Presentation ────────────────────────────────────────────────────────

    fn sleeper_bars(&mut self, world: &str, roster: &Roster) -> Vec<SleepEffect> {
        if !self.config.boss_bar.enabled {
            return Vec::new();
        }
        if roster.sleeping == 0 {
            return self.bars.hide_world(world);
        }
        let total = roster.eligible.max(1);
        let percentage = (roster.sleeping * 100 / total).to_string();
        let current = roster.sleeping.to_string();
        let required = self.required(roster.eligible).to_string();
        let total_str = roster.eligible.to_string();
        let progress = roster.sleeping as f32 / total as f32;
        let (color, overlay) = (self.config.boss_bar_color(), self.config.boss_bar_overlay());

        let mut effects = Vec::new();
        for member in &roster.members {
            let title = render(
                &self.config.boss_bar.title,
                &[
                    ("player", &member.name),
                    ("percentage", &percentage),
                    ("current", &current),
                    ("required", &required),
                    ("total", &total_str),
                ],
            );
            effects.extend(
                self.bars
                    .show(&member.name, world, title, progress, color, overlay),
            );
        }
        effects
    }

    fn countdown_bars(
        &mut self,
        world: &str,
        members: &[PluginPlayer],
        now: u64,
    ) -> Vec<SleepEffect> {
        if !self.config.boss_bar.enabled {
            return Vec::new();
        }
        let (Some(progress), Some(remaining)) = (
            self.coordinator.progress(world, now),
            self.coordinator.remaining_ms(world, now),
        ) else {
            return Vec::new();
        };
        let seconds = remaining.div_ceil(1000).to_string();
        let title = render(&self.config.boss_bar.countdown_title, &[("seconds", &seconds)]);
        let (color, overlay) = (self.config.boss_bar_color(), self.config.boss_bar_overlay());
        members
            .iter()
            .filter_map(|m| {
                self.bars
                    .show(&m.name, world, title.clone(), progress, color, overlay)
            })
            .collect()
    }

    fn sleep_effects(&self, player: &PluginPlayer, population: usize) -> Vec<SleepEffect> {
        let fx = &self.config.effects;
        let mut effects = Vec::new();
        if fx.sounds {
            effects.push(SleepEffect::PlaySound {
                world: player.world.clone(),
                position: player.position,
                sound: "block.note_block.chime",
                volume: 1.0,
                pitch: 1.0,
            });
        }
        if fx.particles {
            let n = particle_count(population, fx.optimize_particles, fx.max_particles_per_player);
            let above = (player.position.0, player.position.1 + 1.5, player.position.2);
            effects.push(SleepEffect::SpawnParticles {
                world: player.world.clone(),
                position: above,
                particle: "cloud",
                count: (n / 2).max(1),
            });
            effects.push(SleepEffect::SpawnParticles {
                world: player.world.clone(),
                position: above,
                particle: "enchant",
                count: n,
            });
        }
        effects
    }

    fn morning_effects(&self, members: &[PluginPlayer]) -> Vec<SleepEffect> {
        let fx = &self.config.effects;
        let n = particle_count(members.len(), fx.optimize_particles, fx.max_particles_per_player);
        let mut effects = Vec::new();
        for p in members {
            if fx.sounds {
                effects.push(SleepEffect::PlaySound {
                    world: p.world.clone(),
                    position: p.position,
                    sound: "entity.chicken.ambient",
                    volume: 1.0,
                    pitch: 0.8,
                });
                effects.push(SleepEffect::PlaySound {
                    world: p.world.clone(),
                    position: p.position,
                    sound: "block.note_block.bell",
                    volume: 0.7,
                    pitch: 1.2,
                });
            }
            if fx.particles {
                let above = (p.position.0, p.position.1 + 2.0, p.position.2);
                effects.push(SleepEffect::SpawnParticles {
                    world: p.world.clone(),
                    position: above,
                    particle: "flame",
                    count: (n / 2).max(1),
                });
                effects.push(SleepEffect::SpawnParticles {
                    world: p.world.clone(),
                    position: above,
                    particle: "happy_villager",
                    count: n,
                });
                effects.push(SleepEffect::SpawnParticles {
                    world: p.world.clone(),
                    position: (p.position.0, p.position.1 + 3.0, p.position.2),
                    particle: "firework",
                    count: 5,
                });
            }
        }
        effects
    }

    // ─── State transitions ───────────────────────────────────────────────────

    /// `Idle → Pending` if the world's headcount allows it.
    fn try_start(
        &mut self,
        world: &PluginWorld,
        roster: &Roster,
        trigger: Option<&PluginPlayer>,
        now: u64,
    ) -> Vec<SleepEffect> {
        if roster.sleeping == 0
            || roster.sleeping < self.required(roster.eligible)
            || !(time::is_night(world.time) || world.thundering)
            || self.coordinator.is_busy(&world.name)
            || self.cooldowns.is_active(&world.name, now)
        {
            return Vec::new();
        }
        if !self
            .coordinator
            .start(&world.name, now, self.config.sleep_delay_ms())
        {
            return Vec::new();
        }

        let Some(sleeper) = trigger.or_else(|| roster.first_sleeper()) else {
            return Vec::new();
        };
        let label = if self.config.percentage_mode {
            format!("{} players", roster.sleeping)
        } else {
            sleeper.name.clone()
        };
        if self.config.log_sleep_events {
            info!(
                "Night skip pending in {} ({}/{} eligible sleeping)",
                world.name, roster.sleeping, roster.eligible
            );
        }

        let mut effects = vec![SleepEffect::Broadcast {
            message: render(&self.config.message("player-sleeping"), &[("player", &label)]),
        }];
        effects.extend(self.sleep_effects(sleeper, roster.members.len()));
        effects.extend(self.countdown_bars(&world.name, &roster.members, now));
        effects
    }

    /// `Pending → Idle` once nobody is left in bed.
    fn settle_after_wake(
        &mut self,
        world: &str,
        roster: &Roster,
        player: &PluginPlayer,
    ) -> Vec<SleepEffect> {
        if roster.sleeping > 0 {
            if self.coordinator.is_busy(world) {
                return Vec::new();
            }
            return self.sleeper_bars(world, roster);
        }

        let mut effects = Vec::new();
        if self.coordinator.cancel(world) {
            if self.config.log_sleep_events {
                info!("Night skip in {world} cancelled: nobody is sleeping");
            }
            effects.push(SleepEffect::Broadcast {
                message: render(
                    &self.config.message("player-woke-up"),
                    &[("player", &player.name)],
                ),
            });
        }
        if !self.coordinator.is_busy(world) {
            effects.extend(self.bars.hide_world(world));
        }
        effects
    }

    /// Morning: the end of `Pending` or `Skipping`.
    fn finish_skip(
        &mut self,
        world: &str,
        members: &[PluginPlayer],
        now: u64,
    ) -> Vec<SleepEffect> {
        self.coordinator.finish(world);
        let mut effects = Vec::new();
        if self.config.clear_weather {
            effects.push(SleepEffect::ClearWeather {
                world: world.to_string(),
            });
        }
        effects.push(SleepEffect::Broadcast {
            message: self.config.message("good-morning"),
        });
        effects.extend(self.morning_effects(members));
        effects.extend(self.bars.hide_world(world));
        self.cooldowns.set(world, now);
        self.stats.record_sleep_event();
        if self.config.auto_save.enabled {
            effects.push(SleepEffect::ScheduleSave {
                world: world.to_string(),
                delay_ticks: self.config.auto_save.delay_ticks,
            });
        }
        if self.config.log_sleep_events {
            info!("Night skipped in {world}");
        }
        effects
    }

    fn advance_skipping(
        &mut self,
        world: &PluginWorld,
        members: &[PluginPlayer],
        now: u64,
    ) -> Vec<SleepEffect> {
        if time::is_day(world.time) {
            return self.finish_skip(&world.name, members, now);
        }
        let next = world.time + self.config.smooth_sleep.speed;
        let mut effects = vec![SleepEffect::SetTime {
            world: world.name.clone(),
            time: next,
        }];
        if time::is_day(next) {
            effects.extend(self.finish_skip(&world.name, members, now));
        }
        effects
    }

    // ─── Commands ────────────────────────────────────────────────────────────

    /// Run a `/sleep` sub-command. Permission checks are the caller's job.
    pub fn execute(
        &mut self,
        command: &SleepCommand,
        ctx: &CommandContext,
        snapshot: &Snapshot,
        now: u64,
    ) -> (CommandResult, Vec<SleepEffect>) {
        match command {
            SleepCommand::Skip { world } => self.manual_skip(world.as_deref(), ctx, snapshot),
            SleepCommand::Stats => (self.stats_report(), Vec::new()),
            SleepCommand::Reload => (
                CommandResult::ok("&aConfiguration reloaded successfully!"),
                Vec::new(),
            ),
            SleepCommand::Debug => {
                self.config.debug_mode = !self.config.debug_mode;
                let state = if self.config.debug_mode { "enabled" } else { "disabled" };
                info!("Debug mode {state} by {}", ctx.sender_name);
                let mut lines = vec![format!("&aDebug mode {state}!")];
                if self.config.debug_mode {
                    if let Some(name) = ctx.target_world(None) {
                        lines.extend(self.world_status(&name, snapshot, now));
                    }
                }
                (CommandResult::lines(lines), Vec::new())
            }
            SleepCommand::Cooldown { action, world } => {
                (self.cooldown_command(*action, world.as_deref(), ctx, now), Vec::new())
            }
            SleepCommand::Help => (CommandResult::lines(help_lines()), Vec::new()),
        }
    }

    fn manual_skip(
        &mut self,
        world: Option<&str>,
        ctx: &CommandContext,
        snapshot: &Snapshot,
    ) -> (CommandResult, Vec<SleepEffect>) {
        let Some(name) = ctx.target_world(world) else {
            return (CommandResult::err(self.config.message("world-required")), Vec::new());
        };
        let Some(target) = snapshot.world(&name) else {
            let msg = render(&self.config.message("world-not-found"), &[("world", &name)]);
            return (CommandResult::err(msg), Vec::new());
        };
        if !time::is_night(target.time) {
            let msg = render(&self.config.message("not-night"), &[("world", &name)]);
            return (CommandResult::err(msg), Vec::new());
        }

        self.coordinator.finish(&name);
        let mut effects = self.bars.hide_world(&name);
        effects.push(SleepEffect::SetTime {
            world: name.clone(),
            time: time::next_morning(target.time),
        });
        if self.config.clear_weather {
            effects.push(SleepEffect::ClearWeather { world: name.clone() });
        }
        self.stats.record_manual_skip();
        info!("{} manually skipped the night in {name}", ctx.sender_name);
        let msg = render(
            &self.config.message("manual-skip"),
            &[("player", &ctx.sender_name)],
        );
        (CommandResult::broadcast(msg), effects)
    }

    fn stats_report(&self) -> CommandResult {
        let mut lines = vec![
            "&6=== Sleep Statistics ===".to_string(),
            format!("&eSleep Events: &f{}", self.stats.total_sleeps()),
            format!("&eManual Skips: &f{}", self.stats.manual_skips()),
            "&eTop Sleepers:".to_string(),
        ];
        for (name, count) in self.stats.top(5) {
            lines.push(format!("&7- &f{name}&7: &e{count} times"));
        }
        CommandResult::lines(lines)
    }

    /// Day phase, night progress and AFK holdouts for one world.
    fn world_status(&self, name: &str, snapshot: &Snapshot, now: u64) -> Vec<String> {
        let Some(world) = snapshot.world(name) else {
            return Vec::new();
        };
        let mut lines = vec![match time::night_progress(world.time) {
            Some(progress) => format!(
                "&7{name}: {} ({:.0}% of the night, sunrise in {})",
                time::describe(world.time),
                progress * 100.0,
                time::format_ticks(time::ticks_until_sunrise(world.time).unsigned_abs())
            ),
            None => format!("&7{name}: {}", time::describe(world.time)),
        }];
        for player in snapshot.players_in(name) {
            if self.is_afk(&player.uuid, now) {
                lines.push(format!(
                    "&7- {} AFK for {}s",
                    player.name,
                    self.afk.seconds_idle(&player.uuid, now)
                ));
            }
        }
        lines
    }

    fn cooldown_command(
        &mut self,
        action: CooldownAction,
        world: Option<&str>,
        ctx: &CommandContext,
        now: u64,
    ) -> CommandResult {
        let Some(name) = ctx.target_world(world) else {
            return self.all_cooldowns(action, now);
        };
        match action {
            CooldownAction::Clear => {
                self.cooldowns.clear(&name);
                CommandResult::ok(format!("&aCooldown cleared for world {name}!"))
            }
            CooldownAction::Check => {
                if self.cooldowns.is_active(&name, now) {
                    let secs = self.cooldowns.remaining(&name, now).div_ceil(1000);
                    CommandResult::ok(format!(
                        "&eWorld {name} is on cooldown for {secs} more seconds."
                    ))
                } else {
                    CommandResult::ok(format!("&aWorld {name} is not on cooldown."))
                }
            }
        }
    }

    /// Console form of `/sleep cooldown` with no world: acts on every world.
    fn all_cooldowns(&mut self, action: CooldownAction, now: u64) -> CommandResult {
        match action {
            CooldownAction::Clear => {
                self.cooldowns.clear_all();
                CommandResult::ok("&aAll cooldowns cleared!")
            }
            CooldownAction::Check => {
                let active = self.cooldowns.active(now);
                if active.is_empty() {
                    return CommandResult::ok("&aNo world is on cooldown.");
                }
                CommandResult::lines(
                    active
                        .into_iter()
                        .map(|(name, expiry)| {
                            let secs = expiry.saturating_sub(now).div_ceil(1000);
                            format!("&eWorld {name} is on cooldown for {secs} more seconds.")
                        })
                        .collect(),
                )
            }
        }
    }
}

impl SleepEvents for SleepEngine {
    fn on_player_join(&mut self, player: &PluginPlayer, now: u64) -> Vec<SleepEffect> {
        self.afk.record_activity(player, now);
        Vec::new()
    }

    fn on_player_quit(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect> {
        self.afk.remove(&player.uuid);
        let mut effects: Vec<SleepEffect> = self.bars.hide(&player.name).into_iter().collect();
        if self.config.is_world_enabled(&player.world) {
            let roster = self.roster(snapshot, &player.world, Change::Remove(&player.uuid), now);
            effects.extend(self.settle_after_wake(&player.world, &roster, player));
        }
        effects
    }

    fn on_bed_enter(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect> {
        if !self.config.is_world_enabled(&player.world) {
            return Vec::new();
        }
        self.afk.record_activity(player, now);
        self.stats.record_player_sleep(&player.name);
        self.debug_log(&format!("{} entered a bed in {}", player.name, player.world));

        if self.cooldowns.is_active(&player.world, now) {
            let secs = self.cooldowns.remaining(&player.world, now).div_ceil(1000);
            return vec![SleepEffect::Message {
                player: player.name.clone(),
                message: render(
                    &self.config.message("on-cooldown"),
                    &[("seconds", &secs.to_string())],
                ),
            }];
        }
        if self.coordinator.is_busy(&player.world) {
            return Vec::new();
        }

        let roster = self.roster(snapshot, &player.world, Change::Upsert(player), now);
        let Some(world) = snapshot.world(&player.world) else {
            return Vec::new();
        };
        let started = self.try_start(world, &roster, Some(player), now);
        if started.is_empty() {
            self.sleeper_bars(&player.world, &roster)
        } else {
            started
        }
    }

    fn on_bed_leave(
        &mut self,
        player: &PluginPlayer,
        snapshot: &Snapshot,
        now: u64,
    ) -> Vec<SleepEffect> {
        if !self.config.is_world_enabled(&player.world) {
            return Vec::new();
        }
        self.debug_log(&format!("{} left a bed in {}", player.name, player.world));
        let roster = self.roster(snapshot, &player.world, Change::Upsert(player), now);
        self.settle_after_wake(&player.world, &roster, player)
    }

    fn on_player_move(
        &mut self,
        player: &PluginPlayer,
        from: (f32, f32, f32),
        to: (f32, f32, f32),
        now: u64,
    ) -> Vec<SleepEffect> {
        self.afk.record_move(player, from, to, now);
        Vec::new()
    }

    fn on_player_interact(&mut self, player: &PluginPlayer, now: u64) -> Vec<SleepEffect> {
        self.afk.record_activity(player, now);
        Vec::new()
    }

    fn on_tick(&mut self, snapshot: &Snapshot, now: u64) -> Vec<SleepEffect> {
        self.ticks += 1;
        let interval = self.config.afk.check_interval_ticks.max(1);
        if self.config.afk.enabled && self.ticks % interval == 0 {
            self.afk.poll(&snapshot.players, now);
        }

        let mut effects = Vec::new();

        for name in self.coordinator.due(now) {
            let Some(world) = snapshot.world(&name) else {
                self.coordinator.finish(&name);
                effects.extend(self.bars.hide_world(&name));
                continue;
            };
            // A daytime storm has no night to fast-forward through.
            if self.config.smooth_sleep.enabled && time::is_night(world.time) {
                self.debug_log(&format!("Fast-forwarding night in {name}"));
                self.coordinator.begin_skipping(&name);
            } else {
                effects.push(SleepEffect::SetTime {
                    world: name.clone(),
                    time: time::next_morning(world.time),
                });
                let members: Vec<PluginPlayer> = snapshot.players_in(&name).cloned().collect();
                effects.extend(self.finish_skip(&name, &members, now));
            }
        }

        for name in self.coordinator.worlds_skipping() {
            let Some(world) = snapshot.world(&name) else {
                self.coordinator.finish(&name);
                continue;
            };
            let members: Vec<PluginPlayer> = snapshot.players_in(&name).cloned().collect();
            effects.extend(self.advance_skipping(world, &members, now));
        }

        for name in self.coordinator.worlds_pending() {
            let members: Vec<PluginPlayer> = snapshot.players_in(&name).cloned().collect();
            effects.extend(self.countdown_bars(&name, &members, now));
        }

        // Idle worlds: AFK timeouts and departures can tip the balance.
        for world in &snapshot.worlds {
            if !self.config.is_world_enabled(&world.name) || self.coordinator.is_busy(&world.name) {
                continue;
            }
            let roster = self.roster(snapshot, &world.name, Change::Unchanged, now);
            if roster.sleeping == 0 {
                effects.extend(self.sleeper_bars(&world.name, &roster));
                continue;
            }
            let started = self.try_start(world, &roster, None, now);
            if started.is_empty() {
                effects.extend(self.sleeper_bars(&world.name, &roster));
            } else {
                effects.extend(started);
            }
        }

        effects
    }
}
