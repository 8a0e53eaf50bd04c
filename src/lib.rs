//! Neon Arcade - Snake, Tetris and Pac-Man for a browser cabinet
//!
//! Core modules:
//! - `sim`: Deterministic simulations (grids, mazes, pieces, ghosts)
//! - `controller`: Lifecycle state machine and fixed-step tick driver
//! - `cabinet`: One game kind wired to its controller
//! - `input`: Keyboard mapping per game
//! - `renderer`: Canvas 2D paint passes over a `Surface`
//! - `settings`: Data-driven game tuning
//! - `highscores`: Per-session leaderboard

pub mod cabinet;
pub mod controller;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use cabinet::Cabinet;
pub use controller::{Command, Controller, Phase, Snapshot};
pub use highscores::HighScores;
pub use input::{GameKind, Intent};
pub use settings::Settings;

/// Loop constants shared by every cabinet
pub mod consts {
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the loop will account for (tab switches, breakpoints)
    pub const MAX_FRAME_MS: f64 = 250.0;
    /// Pause between a cleared level and the next one
    pub const LEVEL_COMPLETE_MS: u32 = 3000;
}
