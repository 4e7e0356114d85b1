use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::grid::Grid;

/// Tunables for a duel. Durations are stored in milliseconds so the file
/// format stays plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Display area the grid is carved out of, in pixels
    pub display_width: i32,
    pub display_height: i32,
    /// Side length of one grid cell, in pixels
    pub cell_size: i32,

    pub initial_length: usize,
    /// Ticks per move without effects; lower is faster
    pub base_move_interval: u32,
    pub dash_distance: i32,

    pub power_up_duration_ms: u64,
    pub reverse_duration_ms: u64,
    pub power_up_interval_ms: u64,
    /// How long an uncollected power-up stays on the grid
    pub power_up_freshness_ms: u64,
    pub portal_interval_ms: u64,
    pub portal_lifetime_ms: u64,
    pub clone_lifetime_ms: u64,
    pub combo_window_ms: u64,
    /// Combo count at which a snake spawns a clone of itself
    pub combo_clone_threshold: u32,

    /// Give the AI snake intercept behaviour when it is ahead in size
    pub advanced_ai: bool,
    pub starting_difficulty: u8,

    pub tick_ms: u64,
    pub data_dir: String,
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            display_width: 400,
            display_height: 300,
            cell_size: 10,
            initial_length: 3,
            base_move_interval: 7,
            dash_distance: 2,
            power_up_duration_ms: 5_000,
            reverse_duration_ms: 2_000,
            power_up_interval_ms: 10_000,
            power_up_freshness_ms: 10_000,
            portal_interval_ms: 15_000,
            portal_lifetime_ms: 5_000,
            clone_lifetime_ms: 5_000,
            combo_window_ms: 5_000,
            combo_clone_threshold: 3,
            advanced_ai: true,
            starting_difficulty: 1,
            tick_ms: 16,
            data_dir: ".snake_duel".to_string(),
            player_name: "Player".to_string(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file, falling back to defaults when it is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                info!("No config at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::from_display(self.display_width, self.display_height, self.cell_size)
    }

    pub fn power_up_duration(&self) -> Duration {
        Duration::from_millis(self.power_up_duration_ms)
    }

    pub fn reverse_duration(&self) -> Duration {
        Duration::from_millis(self.reverse_duration_ms)
    }

    pub fn power_up_interval(&self) -> Duration {
        Duration::from_millis(self.power_up_interval_ms)
    }

    pub fn power_up_freshness(&self) -> Duration {
        Duration::from_millis(self.power_up_freshness_ms)
    }

    pub fn portal_interval(&self) -> Duration {
        Duration::from_millis(self.portal_interval_ms)
    }

    pub fn portal_lifetime(&self) -> Duration {
        Duration::from_millis(self.portal_lifetime_ms)
    }

    pub fn clone_lifetime(&self) -> Duration {
        Duration::from_millis(self.clone_lifetime_ms)
    }

    pub fn combo_window(&self) -> Duration {
        Duration::from_millis(self.combo_window_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid(), Grid::new(40, 30));
        assert_eq!(config.base_move_interval, 7);
        assert_eq!(config.power_up_duration(), Duration::from_secs(5));
        assert_eq!(config.reverse_duration(), Duration::from_secs(2));
        assert_eq!(config.power_up_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "display_width": 200, "starting_difficulty": 4 }"#).unwrap();
        assert_eq!(config.grid(), Grid::new(20, 30));
        assert_eq!(config.starting_difficulty, 4);
        assert_eq!(config.dash_distance, 2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load_or_default("/nonexistent/snake_duel/config.json");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("snake_duel_cfg_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let config = GameConfig::load_or_default(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(config, GameConfig::default());
    }
}
