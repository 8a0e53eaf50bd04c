//! Ghost entities and their targeting rules
//!
//! Each ghost kind owns one pure targeting function, selected from a lookup
//! table by the kind tag. Direction choice is shared: at a cell centre a
//! ghost takes the open, non-reversing exit closest to its target, or a
//! random one while frightened.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Wrap, is_valid_move};
use super::countdown::Countdown;
use super::grid::{Direction, Grid, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "Blinky",
            GhostKind::Pinky => "Pinky",
            GhostKind::Inky => "Inky",
            GhostKind::Clyde => "Clyde",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    Chase,
    Scatter,
    Frightened,
}

/// Everything a targeting rule may look at
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player: IVec2,
    pub player_dir: Direction,
    pub blinky: IVec2,
    /// The ghost doing the targeting
    pub ghost: IVec2,
    pub corner: IVec2,
}

pub type TargetRule = fn(&TargetContext) -> IVec2;

/// Chase rules indexed by `GhostKind as usize`
pub const CHASE_RULES: [TargetRule; 4] = [direct_chase, lookahead_chase, vector_chase, shy_chase];

/// Clyde gives up the chase inside this many cells
pub const SHY_RADIUS: i32 = 8;

/// Blinky: the player's cell
fn direct_chase(ctx: &TargetContext) -> IVec2 {
    ctx.player
}

/// Pinky: four cells ahead of the player
fn lookahead_chase(ctx: &TargetContext) -> IVec2 {
    ctx.player + ctx.player_dir.offset() * 4
}

/// Inky: double the vector from Blinky to two cells ahead of the player
fn vector_chase(ctx: &TargetContext) -> IVec2 {
    let pivot = ctx.player + ctx.player_dir.offset() * 2;
    pivot + (pivot - ctx.blinky)
}

/// Clyde: chase from afar, retreat to his corner up close
fn shy_chase(ctx: &TargetContext) -> IVec2 {
    if ctx.ghost.distance_squared(ctx.player) > SHY_RADIUS * SHY_RADIUS {
        ctx.player
    } else {
        ctx.corner
    }
}

pub fn chase_target(kind: GhostKind, ctx: &TargetContext) -> IVec2 {
    CHASE_RULES[kind as usize](ctx)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Vec2,
    pub dir: Direction,
    pub mode: GhostMode,
    /// Holding cell used at spawn and after capture
    pub home: IVec2,
    pub in_house: bool,
    /// Time left before leaving the house
    pub release: Countdown,
    pub target: IVec2,
}

impl Ghost {
    pub fn new(kind: GhostKind, home: IVec2, release_ms: u32, mode: GhostMode) -> Self {
        Self {
            kind,
            pos: home.as_vec2(),
            dir: Direction::Left,
            mode,
            home,
            in_house: true,
            release: Countdown::new(release_ms),
            target: home,
        }
    }

    pub fn cell(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == GhostMode::Frightened
    }

    /// Enter frightened mode. Ghosts already in the maze turn around.
    pub fn frighten(&mut self) {
        self.mode = GhostMode::Frightened;
        if !self.in_house {
            self.dir = self.dir.opposite();
        }
    }

    /// Back to the holding cell with a fresh release delay
    pub fn send_home(&mut self, release_ms: u32, mode: GhostMode) {
        self.pos = self.home.as_vec2();
        self.dir = Direction::Left;
        self.mode = mode;
        self.in_house = true;
        self.release.start(release_ms);
        self.target = self.home;
    }

    /// Pick the exit to take from the current cell centre
    pub fn choose_direction<R: Rng + ?Sized>(&self, grid: &Grid<Tile>, rng: &mut R) -> Direction {
        let cell = self.cell();
        let reverse = self.dir.opposite();
        let open = |d: Direction| is_valid_move(grid, cell + d.offset(), Wrap::Horizontal);
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != reverse && open(*d))
            .collect();

        if options.is_empty() {
            // Dead end: turning back is the only way out
            return if open(reverse) { reverse } else { self.dir };
        }
        if self.is_frightened() {
            return options[rng.random_range(0..options.len())];
        }
        options
            .into_iter()
            .min_by_key(|d| (cell + d.offset()).distance_squared(self.target))
            .unwrap_or(self.dir)
    }
}
