//! Per-player progress bars.

use std::collections::HashMap;

use slumber_plugin_api::{BossBarColor, BossBarOverlay, BossBarView};

use crate::effect::SleepEffect;

#[derive(Debug, Clone)]
struct BarHandle {
    world: String,
    view: BossBarView,
}

/// One bar handle per player, reused across updates.
#[derive(Debug, Default)]
pub struct ProgressBars {
    bars: HashMap<String, BarHandle>,
    next_id: u64,
}

impl ProgressBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `player` a bar, or update the one they already have.
    ///
    /// Returns `None` when the player already sees exactly this bar.
    pub fn show(
        &mut self,
        player: &str,
        world: &str,
        title: String,
        progress: f32,
        color: BossBarColor,
        overlay: BossBarOverlay,
    ) -> Option<SleepEffect> {
        let progress = progress.clamp(0.0, 1.0);
        if let Some(handle) = self.bars.get_mut(player) {
            let view = &mut handle.view;
            if view.title == title
                && view.progress == progress
                && view.color == color
                && view.overlay == overlay
                && handle.world == world
            {
                return None;
            }
            view.title = title;
            view.progress = progress;
            view.color = color;
            view.overlay = overlay;
            handle.world = world.to_string();
            return Some(SleepEffect::UpdateBar {
                player: player.to_string(),
                bar: handle.view.clone(),
            });
        }

        self.next_id += 1;
        let view = BossBarView {
            id: self.next_id,
            title,
            progress,
            color,
            overlay,
        };
        self.bars.insert(
            player.to_string(),
            BarHandle {
                world: world.to_string(),
                view: view.clone(),
            },
        );
        Some(SleepEffect::ShowBar {
            player: player.to_string(),
            bar: view,
        })
    }

    pub fn hide(&mut self, player: &str) -> Option<SleepEffect> {
        self.bars.remove(player).map(|h| SleepEffect::HideBar {
            player: player.to_string(),
            bar_id: h.view.id,
        })
    }

    /// Hide every bar shown for `world`.
    pub fn hide_world(&mut self, world: &str) -> Vec<SleepEffect> {
        let players: Vec<String> = self
            .bars
            .iter()
            .filter(|(_, h)| h.world == world)
            .map(|(p, _)| p.clone())
            .collect();
        players.iter().filter_map(|p| self.hide(p)).collect()
    }

    pub fn hide_all(&mut self) -> Vec<SleepEffect> {
        self.bars
            .drain()
            .map(|(player, h)| SleepEffect::HideBar {
                player,
                bar_id: h.view.id,
            })
            .collect()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.bars.contains_key(player)
    }

    pub fn get(&self, player: &str) -> Option<&BossBarView> {
        self.bars.get(player).map(|h| &h.view)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
