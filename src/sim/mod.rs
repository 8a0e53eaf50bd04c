//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (each state reports its own tick length)
//! - Seeded RNG only, passed in by the caller
//! - Timed modes are countdowns inside the state, never runtime timers
//! - No rendering or platform dependencies

pub mod collision;
pub mod countdown;
pub mod event;
pub mod ghost;
pub mod grid;
pub mod maze;
pub mod pacman;
pub mod snake;
pub mod tetris;

use rand::Rng;

use crate::input::Intent;

pub use collision::{Passable, Wrap, is_valid_move, resolve};
pub use countdown::Countdown;
pub use event::GameEvent;
pub use ghost::{Ghost, GhostKind, GhostMode};
pub use grid::{Direction, Grid, Tile};
pub use maze::{CLASSIC_LAYOUT, Maze, MazeError};
pub use pacman::{PacmanState, PowerUp};
pub use snake::{Food, FoodKind, SnakeState};
pub use tetris::{Piece, Shape, TetrisAction, TetrisState};

/// One cabinet's game rules, stepped by a [`crate::controller::Controller`]
pub trait Simulation: Sized {
    type Settings: Clone;

    /// Fresh game at level start
    fn new_game<R: Rng + ?Sized>(settings: &Self::Settings, rng: &mut R) -> Self;

    /// Simulated milliseconds per tick; may change with level
    fn tick_ms(&self) -> u32;

    /// Buffer a gameplay intent for the next tick. Must not move anything.
    fn apply_intent(&mut self, intent: Intent);

    /// Advance one tick and report what happened
    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent>;

    /// Called once the level-complete pause has elapsed
    fn advance_level(&mut self) {}

    /// Terminal state reached
    fn is_over(&self) -> bool;

    /// Level finished; the controller pauses, then calls `advance_level`
    fn level_cleared(&self) -> bool {
        false
    }

    fn score(&self) -> u64;

    fn level(&self) -> u32;

    /// `None` for games without lives
    fn lives(&self) -> Option<u8> {
        None
    }
}
