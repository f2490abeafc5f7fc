//! Per-world cooldown after a night skip.

use std::collections::HashMap;

use tracing::debug;

/// Tracks when each world may skip its night again.
///
/// Entries are absolute expiry timestamps in milliseconds and are dropped
/// lazily the first time they are seen expired.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    expiries: HashMap<String, u64>,
    duration_ms: u64,
}

impl CooldownTracker {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            expiries: HashMap::new(),
            duration_ms,
        }
    }

    /// Change the duration used by future `set` calls. Running cooldowns keep their expiry.
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn set(&mut self, world: &str, now: u64) {
        let expiry = now.saturating_add(self.duration_ms);
        self.expiries.insert(world.to_string(), expiry);
        debug!("Cooldown set for world {world} until {expiry}");
    }

    pub fn is_active(&mut self, world: &str, now: u64) -> bool {
        match self.expiries.get(world) {
            None => false,
            Some(&expiry) if now >= expiry => {
                self.expiries.remove(world);
                debug!("Cooldown expired for world {world}");
                false
            }
            Some(_) => true,
        }
    }

    /// Milliseconds left, zero when not cooling down.
    pub fn remaining(&self, world: &str, now: u64) -> u64 {
        self.expiries
            .get(world)
            .map_or(0, |&expiry| expiry.saturating_sub(now))
    }

    pub fn clear(&mut self, world: &str) {
        self.expiries.remove(world);
        debug!("Cooldown cleared for world {world}");
    }

    pub fn clear_all(&mut self) {
        self.expiries.clear();
        debug!("All cooldowns cleared");
    }

    /// Every world still cooling down, with its expiry. Prunes expired entries.
    pub fn active(&mut self, now: u64) -> Vec<(String, u64)> {
        self.expiries.retain(|_, expiry| now < *expiry);
        let mut out: Vec<(String, u64)> = self
            .expiries
            .iter()
            .map(|(w, e)| (w.clone(), *e))
            .collect();
        out.sort();
        out
    }
}
