//! Per-world sleep state machine.
//!
//! `Idle → Pending → Skipping → Idle`, with `Pending` cancellable back to
//! `Idle`. A world with no session is idle; a session exists from the moment
//! enough players sleep until the skip completes or is cancelled, so at most
//! one timer can run per world.

use std::collections::HashMap;

/// Required sleepers for `percentage` of `eligible` players, rounded up.
pub fn required_sleepers(eligible: usize, percentage: u32) -> usize {
    (eligible * percentage as usize).div_ceil(100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Counting down to the skip.
    Pending { started_at: u64, delay_ms: u64 },
    /// Fast-forwarding world time towards morning.
    Skipping,
}

#[derive(Debug, Default)]
pub struct SleepCoordinator {
    sessions: HashMap<String, Phase>,
}

impl SleepCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, world: &str) -> Option<Phase> {
        self.sessions.get(world).copied()
    }

    /// Whether `world` has a timer or a skip in progress.
    pub fn is_busy(&self, world: &str) -> bool {
        self.sessions.contains_key(world)
    }

    pub fn is_pending(&self, world: &str) -> bool {
        matches!(self.phase(world), Some(Phase::Pending { .. }))
    }

    /// Start the countdown. Returns false (and changes nothing) if the world
    /// is already busy.
    pub fn start(&mut self, world: &str, now: u64, delay_ms: u64) -> bool {
        if self.is_busy(world) {
            return false;
        }
        self.sessions.insert(
            world.to_string(),
            Phase::Pending {
                started_at: now,
                delay_ms,
            },
        );
        true
    }

    /// Cancel a pending countdown. A skip already under way is not cancelled.
    pub fn cancel(&mut self, world: &str) -> bool {
        if self.is_pending(world) {
            self.sessions.remove(world);
            true
        } else {
            false
        }
    }

    pub fn begin_skipping(&mut self, world: &str) {
        self.sessions.insert(world.to_string(), Phase::Skipping);
    }

    /// Drop whatever the world was doing.
    pub fn finish(&mut self, world: &str) {
        self.sessions.remove(world);
    }

    /// Countdown progress in `0.0..=1.0`, `None` unless pending.
    pub fn progress(&self, world: &str, now: u64) -> Option<f32> {
        match self.phase(world)? {
            Phase::Pending {
                started_at,
                delay_ms,
            } => Some(pending_progress(started_at, delay_ms, now)),
            Phase::Skipping => None,
        }
    }

    /// Milliseconds until a pending countdown elapses.
    pub fn remaining_ms(&self, world: &str, now: u64) -> Option<u64> {
        match self.phase(world)? {
            Phase::Pending {
                started_at,
                delay_ms,
            } => Some((started_at + delay_ms).saturating_sub(now)),
            Phase::Skipping => None,
        }
    }

    /// Pending worlds whose countdown has elapsed, sorted by name.
    pub fn due(&self, now: u64) -> Vec<String> {
        let mut due: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, phase)| match phase {
                Phase::Pending {
                    started_at,
                    delay_ms,
                } => pending_progress(*started_at, *delay_ms, now) >= 1.0,
                Phase::Skipping => false,
            })
            .map(|(w, _)| w.clone())
            .collect();
        due.sort();
        due
    }

    /// Worlds counting down, sorted by name.
    pub fn worlds_pending(&self) -> Vec<String> {
        self.sorted_worlds(|p| matches!(p, Phase::Pending { .. }))
    }

    pub fn worlds_skipping(&self) -> Vec<String> {
        self.sorted_worlds(|p| matches!(p, Phase::Skipping))
    }

    fn sorted_worlds(&self, pred: impl Fn(&Phase) -> bool) -> Vec<String> {
        let mut worlds: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, p)| pred(p))
            .map(|(w, _)| w.clone())
            .collect();
        worlds.sort();
        worlds
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn pending_progress(started_at: u64, delay_ms: u64, now: u64) -> f32 {
    if delay_ms == 0 {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started_at);
    (elapsed as f64 / delay_ms as f64).min(1.0) as f32
}
