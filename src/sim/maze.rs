//! Pac-Man maze layouts
//!
//! Mazes are written as ASCII art, one character per cell:
//! `#` wall, `.` dot, `o` energizer, `-` ghost-house door, `P` player
//! spawn, `1`..`4` ghost homes (Blinky, Pinky, Inky, Clyde), space empty.

use std::fmt;

use glam::IVec2;

use super::ghost::GhostKind;
use super::grid::{Grid, Tile};

/// The classic 28x31 board; row 14 is the wrap tunnel
pub const CLASSIC_LAYOUT: &str = concat!(
    "############################\n",
    "#............##............#\n",
    "#.####.#####.##.#####.####.#\n",
    "#o####.#####.##.#####.####o#\n",
    "#.####.#####.##.#####.####.#\n",
    "#..........................#\n",
    "#.####.##.########.##.####.#\n",
    "#.####.##.########.##.####.#\n",
    "#......##....##....##......#\n",
    "######.##### ## #####.######\n",
    "######.##### ## #####.######\n",
    "######.##    1     ##.######\n",
    "######.## ###--### ##.######\n",
    "######.## #      # ##.######\n",
    "      .   #2 3 4 #   .      \n",
    "######.## #      # ##.######\n",
    "######.## ######## ##.######\n",
    "######.##          ##.######\n",
    "######.## ######## ##.######\n",
    "######.## ######## ##.######\n",
    "#............##............#\n",
    "#.####.#####.##.#####.####.#\n",
    "#.####.#####.##.#####.####.#\n",
    "#o..##.......P........##..o#\n",
    "###.##.##.########.##.##.###\n",
    "###.##.##.########.##.##.###\n",
    "#......##....##....##......#\n",
    "#.##########.##.##########.#\n",
    "#.##########.##.##########.#\n",
    "#..........................#\n",
    "############################\n",
);

/// Why a layout could not be turned into a playable maze
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    Empty,
    Ragged { row: usize, expected: usize, found: usize },
    UnknownTile { row: usize, col: usize, ch: char },
    MissingPlayerSpawn,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::Empty => write!(f, "maze layout has no rows"),
            MazeError::Ragged {
                row,
                expected,
                found,
            } => write!(f, "maze row {row} is {found} cells wide, expected {expected}"),
            MazeError::UnknownTile { row, col, ch } => {
                write!(f, "unknown maze tile {ch:?} at row {row}, column {col}")
            }
            MazeError::MissingPlayerSpawn => write!(f, "maze layout has no player spawn"),
        }
    }
}

impl std::error::Error for MazeError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    /// Walls plus whatever collectibles are still uneaten
    pub grid: Grid<Tile>,
    pub player_spawn: IVec2,
    pub ghost_homes: Vec<(GhostKind, IVec2)>,
    /// Where a released ghost enters the maze
    pub house_exit: IVec2,
}

impl Maze {
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = layout.lines().collect();
        let width = lines.first().map(|l| l.chars().count()).ok_or(MazeError::Empty)?;
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut rows = Vec::with_capacity(lines.len());
        let mut player_spawn = None;
        let mut ghost_homes = Vec::new();
        let mut doors = Vec::new();

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }

            let mut row = Vec::with_capacity(width);
            for (x, ch) in line.chars().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Dot,
                    'o' => Tile::Energizer,
                    '-' => {
                        doors.push(pos);
                        Tile::Door
                    }
                    ' ' => Tile::Empty,
                    'P' => {
                        player_spawn = Some(pos);
                        Tile::Empty
                    }
                    '1'..='4' => {
                        let kind = GhostKind::ALL[(ch as u8 - b'1') as usize];
                        ghost_homes.push((kind, pos));
                        Tile::Empty
                    }
                    _ => return Err(MazeError::UnknownTile { row: y, col: x, ch }),
                };
                row.push(tile);
            }
            rows.push(row);
        }

        let player_spawn = player_spawn.ok_or(MazeError::MissingPlayerSpawn)?;
        ghost_homes.sort_by_key(|(kind, _)| *kind as usize);

        let house_exit = doors
            .iter()
            .min_by_key(|d| (d.y, d.x))
            .map(|d| *d + IVec2::NEG_Y)
            .or_else(|| ghost_homes.first().map(|(_, home)| *home))
            .unwrap_or(player_spawn);

        let grid = Grid::from_rows(rows).ok_or(MazeError::Empty)?;
        Ok(Self {
            grid,
            player_spawn,
            ghost_homes,
            house_exit,
        })
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Dots and energizers still on the board
    pub fn collectibles_left(&self) -> usize {
        self.grid.count(Tile::is_collectible)
    }

    /// Fixed scatter target for each ghost, one per corner
    pub fn scatter_corner(&self, kind: GhostKind) -> IVec2 {
        let right = self.width() - 1;
        let bottom = self.height() - 1;
        match kind {
            GhostKind::Blinky => IVec2::new(right, 0),
            GhostKind::Pinky => IVec2::new(0, 0),
            GhostKind::Inky => IVec2::new(right, bottom),
            GhostKind::Clyde => IVec2::new(0, bottom),
        }
    }

    /// Single-cell walled maze used when a layout fails to parse
    pub fn sealed() -> Self {
        Self {
            grid: Grid::filled(1, 1, Tile::Wall),
            player_spawn: IVec2::ZERO,
            ghost_homes: Vec::new(),
            house_exit: IVec2::ZERO,
        }
    }
}
