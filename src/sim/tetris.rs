//! Tetris rules
//!
//! The well is a `Grid<u8>` of colour ids (0 = empty). Pieces carry their
//! own small matrix and are rotated by a fixed transpose, never looked up
//! from per-shape rotation tables.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::collision::{Wrap, is_valid_move};
use super::event::GameEvent;
use super::grid::Grid;
use crate::input::Intent;
use crate::settings::TetrisSettings;

/// Points for clearing 0..=4 rows at once, before the level multiplier
pub const LINE_POINTS: [u32; 5] = [0, 40, 100, 300, 1200];

/// Anchor offsets tried in order when a rotation collides
pub const KICKS: [IVec2; 5] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(2, 0),
    IVec2::new(-2, 0),
];

/// Score for a clear; `level` is the level before the clear counts
pub fn line_score(cleared: usize, level: u32) -> u32 {
    LINE_POINTS.get(cleared).copied().unwrap_or(0) * (level + 1)
}

pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / 10
}

/// Gravity interval, non-increasing in level
pub fn drop_interval_ms(level: u32, settings: &TetrisSettings) -> u32 {
    settings
        .base_drop_ms
        .saturating_sub(level.saturating_mul(settings.drop_step_ms))
        .max(settings.min_drop_ms)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    /// Colour id written into the well (1..=7)
    pub fn color_id(self) -> u8 {
        match self {
            Shape::I => 1,
            Shape::J => 2,
            Shape::L => 3,
            Shape::O => 4,
            Shape::S => 5,
            Shape::T => 6,
            Shape::Z => 7,
        }
    }

    fn spawn_rows(self) -> &'static [&'static [u8]] {
        match self {
            Shape::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Shape::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Shape::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Shape::O => &[&[1, 1], &[1, 1]],
            Shape::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Shape::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Shape::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        }
    }
}

/// A tetromino in its own local grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub shape: Shape,
    pub cells: Grid<u8>,
}

impl Piece {
    pub fn new(shape: Shape) -> Self {
        let id = shape.color_id();
        let rows = shape
            .spawn_rows()
            .iter()
            .map(|row| row.iter().map(|c| c * id).collect())
            .collect();
        Self {
            shape,
            // Static tables are rectangular
            cells: Grid::from_rows(rows).unwrap_or_else(|| Grid::new(0, 0)),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Shape::ALL[rng.random_range(0..Shape::ALL.len())])
    }

    /// Clockwise quarter turn: `rotated[c][rows-1-r] = piece[r][c]`
    pub fn rotated(&self) -> Piece {
        let rows = self.cells.height();
        let cols = self.cells.width();
        let mut out = Grid::new(rows, cols);
        for (pos, cell) in self.cells.iter() {
            out.set(IVec2::new(rows - 1 - pos.y, pos.x), cell);
        }
        Piece {
            shape: self.shape,
            cells: out,
        }
    }

    /// Offsets of the filled cells inside the local grid
    pub fn blocks(&self) -> impl Iterator<Item = (IVec2, u8)> + '_ {
        self.cells.iter().filter(|(_, c)| *c != 0)
    }
}

/// Player actions, buffered until the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TetrisAction {
    Left,
    Right,
    SoftDrop,
    Rotate,
    HardDrop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetrisState {
    pub settings: TetrisSettings,
    pub board: Grid<u8>,
    pub piece: Piece,
    pub next: Piece,
    /// Anchor of the active piece's local grid in the well
    pub pos: IVec2,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Time accumulated toward the next gravity step
    pub gravity_ms: u32,
    pub pending: VecDeque<TetrisAction>,
    pub over: bool,
}

impl TetrisState {
    pub fn new<R: Rng + ?Sized>(settings: &TetrisSettings, rng: &mut R) -> Self {
        let mut state = Self {
            settings: settings.clone(),
            board: Grid::new(settings.width, settings.height),
            piece: Piece::random(rng),
            next: Piece::random(rng),
            pos: settings.spawn(),
            score: 0,
            lines: 0,
            level: 0,
            gravity_ms: 0,
            pending: VecDeque::new(),
            over: false,
        };
        if !state.fits(&state.piece, state.pos) {
            log::error!("Tetris well too small for the first piece");
            state.over = true;
        }
        state
    }

    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level, &self.settings)
    }

    /// Every filled cell of `piece` anchored at `pos` is in bounds and empty
    pub fn fits(&self, piece: &Piece, pos: IVec2) -> bool {
        piece
            .blocks()
            .all(|(offset, _)| is_valid_move(&self.board, pos + offset, Wrap::None))
    }

    /// Translate the active piece; rejected moves leave it untouched
    pub fn try_move(&mut self, delta: IVec2) -> bool {
        let target = self.pos + delta;
        if self.fits(&self.piece, target) {
            self.pos = target;
            true
        } else {
            false
        }
    }

    /// Rotate with kicks. On failure piece and anchor are unchanged.
    pub fn rotate(&mut self) -> bool {
        let rotated = self.piece.rotated();
        let anchor = std::iter::once(IVec2::ZERO)
            .chain(KICKS)
            .map(|kick| self.pos + kick)
            .find(|pos| self.fits(&rotated, *pos));

        match anchor {
            Some(pos) => {
                self.piece = rotated;
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Anchor where the active piece would land
    pub fn shadow_position(&self) -> IVec2 {
        let mut pos = self.pos;
        while self.fits(&self.piece, pos + IVec2::Y) {
            pos += IVec2::Y;
        }
        pos
    }

    /// One row of gravity (also the soft-drop key): move down or lock
    pub fn drop_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        if self.try_move(IVec2::Y) {
            Vec::new()
        } else {
            self.lock(rng)
        }
    }

    /// Drop to the shadow, one point per row travelled, then lock
    pub fn hard_drop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let landing = self.shadow_position();
        let rows = (landing.y - self.pos.y).max(0) as u32;
        self.pos = landing;
        self.score += rows as u64 * self.settings.hard_drop_points_per_row as u64;

        let mut events = vec![GameEvent::HardDrop { rows }];
        events.extend(self.lock(rng));
        events
    }

    /// Merge, clear full rows, score, relevel, then spawn the queued piece
    fn lock<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::PieceLocked];

        for (offset, cell) in self.piece.blocks() {
            self.board.set(self.pos + offset, cell);
        }

        let cleared = self
            .board
            .remove_rows_where(|row| row.iter().all(|c| *c != 0));
        if cleared > 0 {
            let points = line_score(cleared, self.level);
            self.score += points as u64;
            self.lines += cleared as u32;
            events.push(GameEvent::LinesCleared {
                count: cleared as u32,
                points,
            });

            let level = level_for_lines(self.lines);
            if level != self.level {
                self.level = level;
                log::info!(
                    "Tetris level {} (drop every {} ms)",
                    level,
                    self.drop_interval_ms()
                );
                events.push(GameEvent::LevelUp { level });
            }
        }

        if !self.spawn_next(rng) {
            log::info!("Tetris spawn blocked, final score {}", self.score);
            events.push(GameEvent::GameOver { score: self.score });
        }
        events
    }

    /// Promote the preview piece. Returns false (and ends the game) when the
    /// spawn cell is already occupied.
    pub fn spawn_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let next = std::mem::replace(&mut self.next, Piece::random(rng));
        self.piece = next;
        self.pos = self.settings.spawn();
        self.gravity_ms = 0;
        if !self.fits(&self.piece, self.pos) {
            self.over = true;
            self.pending.clear();
            return false;
        }
        true
    }

    pub fn queue(&mut self, action: TetrisAction) {
        if !self.over {
            self.pending.push_back(action);
        }
    }

    fn perform<R: Rng + ?Sized>(&mut self, action: TetrisAction, rng: &mut R) -> Vec<GameEvent> {
        match action {
            TetrisAction::Left => {
                self.try_move(IVec2::NEG_X);
                Vec::new()
            }
            TetrisAction::Right => {
                self.try_move(IVec2::X);
                Vec::new()
            }
            TetrisAction::Rotate => {
                self.rotate();
                Vec::new()
            }
            TetrisAction::SoftDrop => self.drop_one(rng),
            TetrisAction::HardDrop => self.hard_drop(rng),
        }
    }

    /// One input frame: drain buffered actions, then apply gravity
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(action) = self.pending.pop_front() {
            if self.over {
                break;
            }
            events.extend(self.perform(action, rng));
        }
        if self.over {
            return events;
        }

        self.gravity_ms += self.settings.frame_ms;
        if self.gravity_ms >= self.drop_interval_ms() {
            self.gravity_ms = 0;
            events.extend(self.drop_one(rng));
        }
        events
    }
}

impl Simulation for TetrisState {
    type Settings = TetrisSettings;

    fn new_game<R: Rng + ?Sized>(settings: &TetrisSettings, rng: &mut R) -> Self {
        TetrisState::new(settings, rng)
    }

    fn tick_ms(&self) -> u32 {
        self.settings.frame_ms
    }

    fn apply_intent(&mut self, intent: Intent) {
        let action = match intent {
            Intent::MoveLeft => TetrisAction::Left,
            Intent::MoveRight => TetrisAction::Right,
            Intent::SoftDrop => TetrisAction::SoftDrop,
            Intent::Rotate => TetrisAction::Rotate,
            Intent::HardDrop => TetrisAction::HardDrop,
            _ => return,
        };
        self.queue(action);
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        self.step(rng)
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn level(&self) -> u32 {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn game(seed: u64) -> (TetrisState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = TetrisState::new(&TetrisSettings::default(), &mut rng);
        (state, rng)
    }

    fn fill_row_except(board: &mut Grid<u8>, y: i32, gaps: &[i32]) {
        for x in 0..board.width() {
            if !gaps.contains(&x) {
                board.set(IVec2::new(x, y), 8);
            }
        }
    }

    #[test]
    fn test_rotation_transposes_dimensions() {
        let mut piece = Piece::new(Shape::I);
        piece.cells = Grid::from_rows(vec![vec![1, 1, 1], vec![0, 0, 1]]).unwrap();
        let rotated = piece.rotated();
        assert_eq!(rotated.cells.width(), 2);
        assert_eq!(rotated.cells.height(), 3);
        assert_eq!(rotated.cells.row(0), &[0, 1]);
        assert_eq!(rotated.cells.row(1), &[0, 1]);
        assert_eq!(rotated.cells.row(2), &[1, 1]);
    }

    #[test]
    fn test_t_piece_rotation() {
        let rotated = Piece::new(Shape::T).rotated();
        assert_eq!(rotated.cells.row(0), &[0, 6, 0]);
        assert_eq!(rotated.cells.row(1), &[0, 6, 6]);
        assert_eq!(rotated.cells.row(2), &[0, 6, 0]);
    }

    #[test]
    fn test_line_score_table() {
        assert_eq!(line_score(0, 5), 0);
        assert_eq!(line_score(1, 0), 40);
        assert_eq!(line_score(2, 1), 200);
        assert_eq!(line_score(3, 2), 900);
        assert_eq!(line_score(4, 3), 4800);
    }

    #[test]
    fn test_drop_interval_floor() {
        let settings = TetrisSettings::default();
        assert_eq!(drop_interval_ms(0, &settings), 800);
        assert_eq!(drop_interval_ms(1, &settings), 750);
        assert_eq!(drop_interval_ms(14, &settings), 100);
        assert_eq!(drop_interval_ms(40, &settings), 100);
    }

    #[test]
    fn test_hard_drop_o_piece_on_empty_board() {
        let (mut s, mut rng) = game(1);
        s.piece = Piece::new(Shape::O);
        s.pos = IVec2::new(3, 0);

        let events = s.hard_drop(&mut rng);

        assert_eq!(events[0], GameEvent::HardDrop { rows: 18 });
        assert_eq!(s.score, 18);
        // Bottom row of the piece sits on the last board row
        assert_eq!(s.board.get(IVec2::new(3, 19)), Some(&4));
        assert_eq!(s.board.get(IVec2::new(4, 19)), Some(&4));
        assert_eq!(s.board.get(IVec2::new(3, 18)), Some(&4));
        assert_eq!(s.board.get(IVec2::new(3, 17)), Some(&0));
        assert_eq!(s.pos, s.settings.spawn());
    }

    #[test]
    fn test_clearing_two_rows() {
        let (mut s, mut rng) = game(2);
        fill_row_except(&mut s.board, 18, &[3, 4]);
        fill_row_except(&mut s.board, 19, &[3, 4]);
        s.piece = Piece::new(Shape::O);
        s.pos = IVec2::new(3, 0);

        let events = s.hard_drop(&mut rng);

        assert!(events.contains(&GameEvent::LinesCleared {
            count: 2,
            points: 100
        }));
        assert_eq!(s.score, 118);
        assert_eq!(s.lines, 2);
        assert_eq!(s.board.height(), 20);
        assert_eq!(s.board.count(|c| c != 0), 0);
    }

    #[test]
    fn test_tetris_uses_level_before_clear() {
        let (mut s, mut rng) = game(3);
        s.lines = 28;
        s.level = 2;
        for y in 16..20 {
            fill_row_except(&mut s.board, y, &[0]);
        }
        // Vertical I: filled column is local x = 2
        s.piece = Piece::new(Shape::I).rotated();
        s.pos = IVec2::new(-2, 0);

        s.hard_drop(&mut rng);

        assert_eq!(s.score, 16 + 1200 * 3);
        assert_eq!(s.lines, 32);
        assert_eq!(s.level, 3);
        assert_eq!(s.drop_interval_ms(), 650);
    }

    #[test]
    fn test_level_up_event() {
        let (mut s, mut rng) = game(4);
        s.lines = 9;
        fill_row_except(&mut s.board, 19, &[3, 4]);
        s.piece = Piece::new(Shape::O);
        s.pos = IVec2::new(3, 0);
        let events = s.hard_drop(&mut rng);
        assert!(events.contains(&GameEvent::LevelUp { level: 1 }));
        assert_eq!(s.score, 18 + 40);
    }

    #[test]
    fn test_rotation_kicks_right_two() {
        let (mut s, _) = game(5);
        s.piece = Piece::new(Shape::I).rotated();
        s.pos = IVec2::new(-2, 5);
        assert!(s.fits(&s.piece, s.pos));

        assert!(s.rotate());
        // Horizontal I only fits once shifted two columns right
        assert_eq!(s.pos, IVec2::new(0, 5));
        assert_eq!(s.piece.cells.row(2), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_rotation_rejected_without_room() {
        let (mut s, _) = game(6);
        s.piece = Piece::new(Shape::I).rotated();
        s.pos = IVec2::new(-2, 5);
        for (pos, _) in s.board.clone().iter() {
            if !(pos.x == 0 && (5..9).contains(&pos.y)) {
                s.board.set(pos, 8);
            }
        }
        let before = (s.piece.clone(), s.pos);
        assert!(!s.rotate());
        assert_eq!((s.piece.clone(), s.pos), before);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let (mut s, mut rng) = game(7);
        s.piece = Piece::new(Shape::O);
        s.next = Piece::new(Shape::O);
        s.pos = IVec2::new(0, 18);
        s.board.set(IVec2::new(4, 1), 8);

        let events = s.hard_drop(&mut rng);

        assert!(s.over);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_actions_wait_for_frame() {
        let (mut s, mut rng) = game(8);
        let start = s.pos;
        s.apply_intent(Intent::MoveRight);
        s.apply_intent(Intent::MoveRight);
        assert_eq!(s.pos, start);
        s.step(&mut rng);
        assert_eq!(s.pos, start + IVec2::new(2, 0));
    }

    #[test]
    fn test_gravity_follows_drop_interval() {
        let (mut s, mut rng) = game(9);
        let frames = s.drop_interval_ms().div_ceil(s.settings.frame_ms);
        for _ in 0..frames - 1 {
            s.step(&mut rng);
        }
        assert_eq!(s.pos.y, 0);
        s.step(&mut rng);
        assert_eq!(s.pos.y, 1);
    }

    #[test]
    fn test_shadow_is_landing_spot() {
        let (mut s, _) = game(10);
        s.piece = Piece::new(Shape::O);
        s.pos = IVec2::new(3, 0);
        s.board.set(IVec2::new(4, 12), 8);
        assert_eq!(s.shadow_position(), IVec2::new(3, 10));
        // Shadow never moves the piece
        assert_eq!(s.pos, IVec2::new(3, 0));
    }

    proptest! {
        #[test]
        fn prop_four_rotations_identity(index in 0usize..7) {
            let piece = Piece::new(Shape::ALL[index]);
            let spun = piece.rotated().rotated().rotated().rotated();
            prop_assert_eq!(spun, piece);
        }

        #[test]
        fn prop_board_height_invariant(seed in any::<u64>(), actions in prop::collection::vec(0u8..5, 0..200)) {
            let (mut s, mut rng) = game(seed);
            for a in actions {
                let action = match a {
                    0 => TetrisAction::Left,
                    1 => TetrisAction::Right,
                    2 => TetrisAction::SoftDrop,
                    3 => TetrisAction::Rotate,
                    _ => TetrisAction::HardDrop,
                };
                s.queue(action);
                s.step(&mut rng);
                prop_assert_eq!(s.board.height(), 20);
                prop_assert_eq!(s.board.width(), 10);
                if !s.over {
                    prop_assert!(s.fits(&s.piece, s.pos));
                }
            }
        }
    }
}
