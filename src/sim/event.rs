//! Side effects reported by a tick
//!
//! The step functions return these instead of calling out to UI code; the
//! controller and the page shell decide what to show for each one.

use serde::Serialize;

use super::ghost::GhostKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Snake ate food worth `points`
    FoodEaten { points: u32, bonus: bool },
    /// Uneaten bonus food turned back into regular food
    BonusExpired,
    /// Snake filled the whole field
    BoardFilled,
    /// Tetris piece merged into the well
    PieceLocked,
    /// Hard drop travelled `rows` rows
    HardDrop { rows: u32 },
    LinesCleared { count: u32, points: u32 },
    LevelUp { level: u32 },
    DotEaten,
    EnergizerEaten,
    GhostCaptured { ghost: GhostKind, points: u32 },
    /// Scatter/chase schedule flipped
    ModeSwitched,
    FrightenedEnded,
    LifeLost { lives_left: u8 },
    /// Every collectible is gone; the controller starts the level transition
    LevelCleared,
    GameOver { score: u64 },
}
