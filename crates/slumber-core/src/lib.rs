//! Sleep coordination engine.
//!
//! Decides when a world may skip its night: a single sleeper or a
//! percentage of eligible players, gated by per-world cooldowns and AFK
//! detection, with boss-bar progress and sleep statistics. Nothing in here
//! talks to a host directly: every operation takes a millisecond timestamp
//! and a snapshot of players and worlds, and answers with [`SleepEffect`]s.

pub mod afk;
pub mod bossbar;
pub mod config;
pub mod cooldown;
pub mod coordinator;
pub mod effect;
pub mod engine;
pub mod error;
pub mod message;
pub mod stats;
pub mod time;
pub mod version;

pub use afk::AfkDetector;
pub use bossbar::ProgressBars;
pub use config::SleepConfig;
pub use cooldown::CooldownTracker;
pub use coordinator::{required_sleepers, Phase, SleepCoordinator};
pub use effect::SleepEffect;
pub use engine::{SleepEngine, SleepEvents, Snapshot};
pub use error::{ReleaseError, StatsError};
pub use stats::SleepStatistics;
