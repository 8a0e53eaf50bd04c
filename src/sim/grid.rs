//! Fixed-size occupancy grids shared by every cabinet
//!
//! Mazes, the snake field and the Tetris well are all a `Grid<T>` of some
//! cell code. Dimensions never change after construction.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Cardinal movement direction. "No direction" is `Option<Direction>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Tie-break order used when two moves score the same
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit step in grid space (y grows downward)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Maze cell codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    /// Ghost-house gate, closed to everything that walks
    Door,
    Dot,
    Energizer,
}

impl Tile {
    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Dot | Tile::Energizer)
    }
}

/// Row-major grid with fixed dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, T::default())
    }

    pub fn filled(width: i32, height: i32, value: T) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![value; (width * height) as usize],
        }
    }

    /// Build from rows; `None` if the rows are ragged
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        if rows.iter().any(|r| r.len() as i32 != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Write a cell; out-of-bounds writes are dropped and reported as `false`
    pub fn set(&mut self, pos: IVec2, value: T) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: i32) -> &[T] {
        if y < 0 || y >= self.height {
            return &[];
        }
        let start = (y * self.width) as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Iterate `(position, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (IVec2::new(i as i32 % width, i as i32 / width), *c))
    }

    pub fn count(&self, pred: impl Fn(T) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(**c)).count()
    }

    /// Drop every row matching `pred`, shifting the rows above down and
    /// refilling the top with defaults. Returns how many rows were removed.
    pub fn remove_rows_where(&mut self, pred: impl Fn(&[T]) -> bool) -> usize {
        let width = self.width as usize;
        if width == 0 {
            return 0;
        }
        let kept: Vec<T> = self
            .cells
            .chunks(width)
            .filter(|row| !pred(row))
            .flatten()
            .copied()
            .collect();
        let removed = (self.cells.len() - kept.len()) / width;
        let mut cells = vec![T::default(); removed * width];
        cells.extend(kept);
        self.cells = cells;
        removed
    }
}
