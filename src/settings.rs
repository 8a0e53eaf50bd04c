//! Game tuning
//!
//! Every field has a default, so a host page may supply a partial JSON
//! document and only override what it cares about.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Snake tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    /// Square field edge, in cells
    pub grid_size: i32,
    /// Cell of the first (always regular) food
    pub first_food: (i32, i32),

    // === Speed ===
    pub base_interval_ms: u32,
    pub min_interval_ms: u32,
    pub speedup_per_level_ms: u32,
    pub ticks_per_level: u32,

    // === Food ===
    /// Chance (0.0 - 1.0) that new food is a bonus
    pub bonus_chance: f64,
    /// Bonus lifetime before it reverts to regular
    pub bonus_duration_ms: u32,
    pub regular_points: u32,
    pub bonus_points: u32,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            first_food: (15, 10),

            base_interval_ms: 100,
            min_interval_ms: 60,
            speedup_per_level_ms: 5,
            ticks_per_level: 600,

            bonus_chance: 0.1,
            bonus_duration_ms: 5000,
            regular_points: 1,
            bonus_points: 5,
        }
    }
}

/// Tetris tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisSettings {
    /// Well size, in cells
    pub width: i32,
    pub height: i32,
    /// Anchor of a freshly spawned piece
    pub spawn_x: i32,
    pub spawn_y: i32,

    // === Gravity ===
    pub base_drop_ms: u32,
    pub drop_step_ms: u32,
    pub min_drop_ms: u32,
    /// Input frame; buffered actions apply once per frame
    pub frame_ms: u32,

    pub hard_drop_points_per_row: u32,
}

impl TetrisSettings {
    pub fn spawn(&self) -> IVec2 {
        IVec2::new(self.spawn_x, self.spawn_y)
    }
}

impl Default for TetrisSettings {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            spawn_x: 3,
            spawn_y: 0,

            base_drop_ms: 800,
            drop_step_ms: 50,
            min_drop_ms: 100,
            frame_ms: 16,

            hard_drop_points_per_row: 1,
        }
    }
}

/// Pac-Man tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanSettings {
    /// ASCII maze; `None` plays the classic board
    pub layout: Option<String>,
    pub tick_ms: u32,
    pub lives: u8,

    // === Speeds (cells per tick) ===
    pub player_speed: f32,
    pub ghost_speed: f32,
    pub frightened_speed: f32,
    /// Fractional ghost speedup per level past the first, capped at player speed
    pub ghost_speedup_per_level: f32,

    // === Points ===
    pub dot_points: u32,
    pub energizer_points: u32,
    pub ghost_points: u32,

    // === Timers ===
    pub frightened_ms: u32,
    pub invincible_ms: u32,
    /// Alternating scatter/chase durations, scatter first; chase after the last
    pub mode_schedule_ms: Vec<u32>,
    /// House release delays for Blinky, Pinky, Inky, Clyde
    pub release_delays_ms: [u32; 4],
    /// Re-release delay after a ghost is captured
    pub respawn_delay_ms: u32,
    pub death_freeze_ms: u32,

    /// Player/ghost contact distance, in cells
    pub collision_radius: f32,
}

impl Default for PacmanSettings {
    fn default() -> Self {
        Self {
            layout: None,
            tick_ms: 16,
            lives: 3,

            player_speed: 0.125,
            ghost_speed: 0.1,
            frightened_speed: 0.0625,
            ghost_speedup_per_level: 0.05,

            dot_points: 10,
            energizer_points: 50,
            ghost_points: 200,

            frightened_ms: 10_000,
            invincible_ms: 10_000,
            mode_schedule_ms: vec![7000, 20_000, 7000, 20_000, 5000, 20_000, 5000],
            release_delays_ms: [0, 1000, 4000, 8000],
            respawn_delay_ms: 3000,
            death_freeze_ms: 1000,

            collision_radius: 0.5,
        }
    }
}

/// Tuning for every cabinet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub snake: SnakeSettings,
    pub tetris: TetrisSettings,
    pub pacman: PacmanSettings,
}

impl Settings {
    /// Parse a possibly partial JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
