//! Move validity oracle
//!
//! Every game asks the same question before it commits a move: is the
//! target cell inside the grid and open? Tunnel rows remap the x axis
//! first, so a cell one step past either edge is the cell on the other
//! side rather than a rejection.

use glam::IVec2;

use super::grid::{Grid, Tile};

/// Edge behaviour for out-of-range x coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Anything outside the grid is invalid
    None,
    /// x below 0 or at/above width is remapped to the opposite edge
    Horizontal,
}

/// Cell codes that can answer "may something stand here?"
pub trait Passable {
    fn is_passable(&self) -> bool;
}

impl Passable for Tile {
    fn is_passable(&self) -> bool {
        !matches!(self, Tile::Wall | Tile::Door)
    }
}

/// Tetris colour ids: 0 is an empty well cell
impl Passable for u8 {
    fn is_passable(&self) -> bool {
        *self == 0
    }
}

/// Apply tunnel remapping, then the bounds check. Returns the cell that
/// may safely be indexed.
pub fn resolve<T: Copy + Default>(grid: &Grid<T>, pos: IVec2, wrap: Wrap) -> Option<IVec2> {
    let pos = match wrap {
        Wrap::None => pos,
        Wrap::Horizontal if grid.width() > 0 => IVec2::new(pos.x.rem_euclid(grid.width()), pos.y),
        Wrap::Horizontal => pos,
    };
    grid.in_bounds(pos).then_some(pos)
}

/// True if `pos` (after remapping) is inside the grid and passable
pub fn is_valid_move<T: Copy + Default + Passable>(grid: &Grid<T>, pos: IVec2, wrap: Wrap) -> bool {
    resolve(grid, pos, wrap)
        .and_then(|p| grid.get(p))
        .is_some_and(|cell| cell.is_passable())
}
