//! Tetris paint pass
//!
//! The well sits on the left; the preview box takes a strip on the right.

use glam::{IVec2, Vec2};

use super::{Color, Surface, paint_phase_overlay, with_board};
use crate::controller::Phase;
use crate::sim::{Piece, TetrisState};

pub const BACKGROUND: Color = Color::rgb(0x0A, 0x0A, 0x14);
pub const WELL: Color = Color::rgb(0x00, 0x00, 0x00);
pub const GRID: Color = Color::rgb(70, 70, 70);

/// Indexed by colour id; 0 is empty
pub const PALETTE: [Color; 8] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x00, 0xFF, 0xFF),
    Color::rgb(0x00, 0x00, 0xFF),
    Color::rgb(0xFF, 0x88, 0x00),
    Color::rgb(0xFF, 0xFF, 0x00),
    Color::rgb(0x00, 0xFF, 0x00),
    Color::rgb(0xFF, 0x00, 0xFF),
    Color::rgb(0xFF, 0x00, 0x00),
];

pub const SHADOW_ALPHA: f32 = 0.3;

/// Preview strip width, including the gap after the well
const SIDE_PANEL: i32 = 6;
const INSET: f32 = 0.04;

pub fn color_for(id: u8) -> Color {
    PALETTE.get(id as usize).copied().unwrap_or(Color::WHITE)
}

fn block(surface: &mut dyn Surface, cell: Vec2, color: Color) {
    surface.fill_rect(cell + INSET, Vec2::splat(1.0 - 2.0 * INSET), color);
}

fn paint_piece(surface: &mut dyn Surface, piece: &Piece, anchor: IVec2, alpha: f32) {
    for (offset, id) in piece.blocks() {
        block(surface, (anchor + offset).as_vec2(), color_for(id).with_alpha(alpha));
    }
}

pub fn paint(surface: &mut dyn Surface, state: &TetrisState, phase: Phase) {
    surface.clear(BACKGROUND);
    let well = IVec2::new(state.board.width(), state.board.height());
    let cells = well + IVec2::new(SIDE_PANEL, 0);

    with_board(surface, cells, |s| {
        s.fill_rect(Vec2::ZERO, well.as_vec2(), WELL);
        s.stroke_rect(Vec2::ZERO, well.as_vec2(), GRID.with_alpha(0.5), 0.05);

        for (pos, id) in state.board.iter() {
            if id != 0 {
                block(s, pos.as_vec2(), color_for(id));
            }
        }

        if !state.over {
            let shadow = state.shadow_position();
            if shadow != state.pos {
                paint_piece(s, &state.piece, shadow, SHADOW_ALPHA);
            }
            paint_piece(s, &state.piece, state.pos, 1.0);
        }

        let preview = Vec2::new(well.x as f32 + 1.0, 1.0);
        s.stroke_rect(preview, Vec2::splat(4.0), GRID, 0.05);
        s.push_transform(preview, 1.0);
        paint_piece(s, &state.next, IVec2::ZERO, 1.0);
        s.pop_transform();

        paint_phase_overlay(s, well, phase);
    });
}
