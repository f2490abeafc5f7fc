//! AFK detection from position polling and activity events.

use std::collections::HashMap;

use slumber_plugin_api::PluginPlayer;
use tracing::debug;

/// Squared distance a player must cover between polls to count as active.
pub const MOVE_THRESHOLD_SQ: f32 = 0.1;

#[derive(Debug, Clone)]
struct Activity {
    last_active: u64,
    world: String,
    position: (f32, f32, f32),
}

/// Last-activity bookkeeping per player uuid.
#[derive(Debug, Default)]
pub struct AfkDetector {
    records: HashMap<String, Activity>,
}

fn moved(from: (f32, f32, f32), to: (f32, f32, f32)) -> bool {
    let (dx, dy, dz) = (to.0 - from.0, to.1 - from.1, to.2 - from.2);
    dx * dx + dy * dy + dz * dz > MOVE_THRESHOLD_SQ
}

impl AfkDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare every player's position with the previous poll.
    ///
    /// Players seen for the first time start out active.
    pub fn poll(&mut self, players: &[PluginPlayer], now: u64) {
        for player in players {
            match self.records.get_mut(&player.uuid) {
                Some(rec) => {
                    if rec.world != player.world || moved(rec.position, player.position) {
                        rec.last_active = now;
                        debug!("Activity from {} (moved)", player.name);
                    }
                    rec.world.clone_from(&player.world);
                    rec.position = player.position;
                }
                None => self.touch(player, now),
            }
        }
    }

    /// Any interaction counts as activity.
    pub fn record_activity(&mut self, player: &PluginPlayer, now: u64) {
        self.touch(player, now);
    }

    /// A move event. Only counts when it covers the threshold distance.
    pub fn record_move(
        &mut self,
        player: &PluginPlayer,
        from: (f32, f32, f32),
        to: (f32, f32, f32),
        now: u64,
    ) {
        if moved(from, to) {
            self.touch(player, now);
        }
    }

    fn touch(&mut self, player: &PluginPlayer, now: u64) {
        self.records.insert(
            player.uuid.clone(),
            Activity {
                last_active: now,
                world: player.world.clone(),
                position: player.position,
            },
        );
    }

    /// Idle for at least `timeout_ms`. Untracked players are never AFK.
    pub fn is_afk(&self, uuid: &str, now: u64, timeout_ms: u64) -> bool {
        self.records
            .get(uuid)
            .is_some_and(|rec| now.saturating_sub(rec.last_active) >= timeout_ms)
    }

    pub fn seconds_idle(&self, uuid: &str, now: u64) -> u64 {
        self.records
            .get(uuid)
            .map_or(0, |rec| now.saturating_sub(rec.last_active) / 1000)
    }

    pub fn remove(&mut self, uuid: &str) {
        if self.records.remove(uuid).is_some() {
            debug!("Stopped AFK tracking for {uuid}");
        }
    }

    pub fn tracked(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slumber_plugin_api::GameMode;

    fn player(pos: (f32, f32, f32)) -> PluginPlayer {
        PluginPlayer {
            name: "Alex".into(),
            uuid: "u-alex".into(),
            world: "world".into(),
            position: pos,
            gamemode: GameMode::Survival,
            sleeping: false,
        }
    }

    const TIMEOUT: u64 = 60_000;

    #[test]
    fn unknown_player_is_not_afk() {
        let afk = AfkDetector::new();
        assert!(!afk.is_afk("u-alex", 1_000_000, TIMEOUT));
    }

    #[test]
    fn idle_past_timeout_is_afk() {
        let mut afk = AfkDetector::new();
        let p = player((0.0, 64.0, 0.0));
        afk.poll(std::slice::from_ref(&p), 0);
        afk.poll(std::slice::from_ref(&p), 30_000);
        assert!(!afk.is_afk("u-alex", 59_999, TIMEOUT));
        assert!(afk.is_afk("u-alex", 60_000, TIMEOUT));
        assert_eq!(afk.seconds_idle("u-alex", 61_500), 61);
    }

    #[test]
    fn movement_resets_timer() {
        let mut afk = AfkDetector::new();
        afk.poll(&[player((0.0, 64.0, 0.0))], 0);
        afk.poll(&[player((1.0, 64.0, 0.0))], 50_000);
        assert!(!afk.is_afk("u-alex", 100_000, TIMEOUT));
        assert!(afk.is_afk("u-alex", 110_000, TIMEOUT));
    }

    #[test]
    fn tiny_movement_does_not_count() {
        let mut afk = AfkDetector::new();
        afk.poll(&[player((0.0, 64.0, 0.0))], 0);
        afk.poll(&[player((0.2, 64.0, 0.2))], 50_000);
        assert!(afk.is_afk("u-alex", 60_000, TIMEOUT));
    }

    #[test]
    fn world_change_counts() {
        let mut afk = AfkDetector::new();
        let mut p = player((0.0, 64.0, 0.0));
        afk.poll(std::slice::from_ref(&p), 0);
        p.world = "world_nether".into();
        afk.poll(std::slice::from_ref(&p), 50_000);
        assert!(!afk.is_afk("u-alex", 60_000, TIMEOUT));
    }

    #[test]
    fn events_record_activity() {
        let mut afk = AfkDetector::new();
        let p = player((0.0, 64.0, 0.0));
        afk.record_activity(&p, 0);
        afk.record_move(&p, (0.0, 64.0, 0.0), (0.1, 64.0, 0.0), 40_000);
        assert!(afk.is_afk("u-alex", 60_000, TIMEOUT));
        afk.record_move(&p, (0.0, 64.0, 0.0), (2.0, 64.0, 0.0), 50_000);
        assert!(!afk.is_afk("u-alex", 60_000, TIMEOUT));
    }

    #[test]
    fn remove_stops_tracking() {
        let mut afk = AfkDetector::new();
        afk.record_activity(&player((0.0, 0.0, 0.0)), 0);
        assert_eq!(afk.tracked(), 1);
        afk.remove("u-alex");
        assert_eq!(afk.tracked(), 0);
        assert!(!afk.is_afk("u-alex", 1_000_000, TIMEOUT));
    }
}
