//! Side effects the engine asks its host to perform.

use slumber_plugin_api::BossBarView;

/// One host-side action. Chat text and bar titles still carry `&` color codes.
#[derive(Debug, Clone, PartialEq)]
pub enum SleepEffect {
    /// Send to every online player.
    Broadcast { message: String },
    Message { player: String, message: String },
    SetTime { world: String, time: i64 },
    ClearWeather { world: String },
    ShowBar { player: String, bar: BossBarView },
    UpdateBar { player: String, bar: BossBarView },
    HideBar { player: String, bar_id: u64 },
    PlaySound {
        world: String,
        position: (f32, f32, f32),
        sound: &'static str,
        volume: f32,
        pitch: f32,
    },
    /// A burst of particles scattered around `position`.
    SpawnParticles {
        world: String,
        position: (f32, f32, f32),
        particle: &'static str,
        count: u32,
    },
    /// Save the world after `delay_ticks`.
    ScheduleSave { world: String, delay_ticks: u64 },
}

/// Particles per burst, scaled down as a world gets busier.
pub fn particle_count(players_in_world: usize, optimize: bool, max_per_player: u32) -> u32 {
    if !optimize {
        return 2;
    }
    match players_in_world {
        0 | 1 => max_per_player,
        2..=5 => (max_per_player / 2).max(2),
        6..=10 => (max_per_player / 3).max(1),
        _ => 1,
    }
}
