//! One arcade cabinet: a game kind plus its controller
//!
//! The host page deals only in cabinets, so it never needs to know which
//! simulation type sits behind one.

use crate::controller::{Command, Controller, Phase, Snapshot};
use crate::input::{GameKind, Intent, map_key};
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{GameEvent, PacmanState, SnakeState, TetrisState};

pub enum Cabinet {
    Snake(Controller<SnakeState>),
    Tetris(Controller<TetrisState>),
    Pacman(Controller<PacmanState>),
}

/// Forward a call to whichever controller the cabinet holds
macro_rules! each {
    ($cabinet:expr, $c:ident => $body:expr) => {
        match $cabinet {
            Cabinet::Snake($c) => $body,
            Cabinet::Tetris($c) => $body,
            Cabinet::Pacman($c) => $body,
        }
    };
}

impl Cabinet {
    pub fn new(kind: GameKind, settings: &Settings, seed: u64) -> Self {
        log::info!("Opening {} cabinet with seed {seed}", kind.as_str());
        match kind {
            GameKind::Snake => Cabinet::Snake(Controller::new(settings.snake.clone(), seed)),
            GameKind::Tetris => Cabinet::Tetris(Controller::new(settings.tetris.clone(), seed)),
            GameKind::Pacman => Cabinet::Pacman(Controller::new(settings.pacman.clone(), seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Cabinet::Snake(_) => GameKind::Snake,
            Cabinet::Tetris(_) => GameKind::Tetris,
            Cabinet::Pacman(_) => GameKind::Pacman,
        }
    }

    pub fn phase(&self) -> Phase {
        each!(self, c => c.phase())
    }

    /// Map and apply a DOM key. Returns true if the key was bound.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match map_key(self.kind(), key) {
            Some(intent) => {
                self.handle_intent(intent);
                true
            }
            None => false,
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        each!(self, c => c.handle_intent(intent))
    }

    pub fn command(&mut self, command: Command) -> bool {
        each!(self, c => c.command(command))
    }

    pub fn update(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        each!(self, c => c.update(elapsed_ms))
    }

    pub fn snapshot(&self) -> Snapshot {
        let kind = self.kind();
        each!(self, c => c.snapshot(kind))
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        match self {
            Cabinet::Snake(c) => renderer::snake::paint(surface, c.state(), c.phase()),
            Cabinet::Tetris(c) => renderer::tetris::paint(surface, c.state(), c.phase()),
            Cabinet::Pacman(c) => renderer::pacman::paint(surface, c.state(), c.phase()),
        }
    }
}
