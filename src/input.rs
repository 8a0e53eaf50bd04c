//! Keyboard mapping
//!
//! Keys are DOM `KeyboardEvent.key` strings. An arrow key and its WASD twin
//! always produce the same intent. Intents are only buffered; the next
//! simulation tick decides what they do.

use serde::{Deserialize, Serialize};

use crate::sim::Direction;

/// Which game a cabinet runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Snake,
    Tetris,
    Pacman,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Snake, GameKind::Tetris, GameKind::Pacman];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
            GameKind::Pacman => "pacman",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snake" => Some(GameKind::Snake),
            "tetris" => Some(GameKind::Tetris),
            "pacman" | "pac-man" => Some(GameKind::Pacman),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Snake / Pac-Man requested direction
    Steer(Direction),
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    /// Pac-Man debug power-up
    ToggleInvincible,
    // Lifecycle
    Start,
    TogglePause,
    Reset,
}

impl Intent {
    /// Lifecycle intents go to the controller, the rest to the simulation
    pub fn is_lifecycle(self) -> bool {
        matches!(self, Intent::Start | Intent::TogglePause | Intent::Reset)
    }
}

fn arrow_or_wasd(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

pub fn map_key(game: GameKind, key: &str) -> Option<Intent> {
    match game {
        GameKind::Snake => steering_key(key),
        GameKind::Pacman => match key {
            "i" | "I" => Some(Intent::ToggleInvincible),
            _ => steering_key(key),
        },
        GameKind::Tetris => tetris_key(key),
    }
}

fn steering_key(key: &str) -> Option<Intent> {
    match key {
        " " | "Escape" => Some(Intent::TogglePause),
        "Enter" => Some(Intent::Start),
        _ => arrow_or_wasd(key).map(Intent::Steer),
    }
}

fn tetris_key(key: &str) -> Option<Intent> {
    match arrow_or_wasd(key) {
        Some(Direction::Left) => return Some(Intent::MoveLeft),
        Some(Direction::Right) => return Some(Intent::MoveRight),
        Some(Direction::Down) => return Some(Intent::SoftDrop),
        Some(Direction::Up) => return Some(Intent::Rotate),
        None => {}
    }
    match key {
        " " => Some(Intent::HardDrop),
        "p" | "P" | "Escape" => Some(Intent::TogglePause),
        "r" | "R" => Some(Intent::Reset),
        "Enter" => Some(Intent::Start),
        _ => None,
    }
}
