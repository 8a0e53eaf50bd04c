//! Pac-Man paint pass

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{IVec2, Vec2};

use super::{Color, Surface, paint_phase_overlay, with_board};
use crate::controller::Phase;
use crate::sim::{Direction, Ghost, GhostKind, PacmanState, PowerUp, Tile};

pub const BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);
pub const WALL: Color = Color::rgb(0x21, 0x21, 0xDE);
pub const DOOR: Color = Color::rgb(0xFF, 0xB8, 0xDE);
pub const DOT: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const ENERGIZER: Color = Color::rgb(0xFF, 0xFF, 0xF0);
pub const PLAYER: Color = Color::rgb(0xFF, 0xCC, 0x00);
pub const PLAYER_POWERED: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const FRIGHTENED: Color = Color::rgb(0x21, 0x21, 0xDE);
pub const PUPIL: Color = Color::rgb(0x00, 0x00, 0x00);

pub fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::rgb(0xFF, 0x00, 0x00),
        GhostKind::Pinky => Color::rgb(0xFF, 0xC0, 0xCB),
        GhostKind::Inky => Color::rgb(0x00, 0xFF, 0xFF),
        GhostKind::Clyde => Color::rgb(0xFF, 0xA5, 0x00),
    }
}

fn heading(dir: Direction) -> f32 {
    match dir {
        Direction::Right => 0.0,
        Direction::Down => FRAC_PI_2,
        Direction::Left => PI,
        Direction::Up => -FRAC_PI_2,
    }
}

/// Mouth half-angle: shut on a cell centre, widest between cells
pub fn mouth_angle(pos: Vec2) -> f32 {
    let between = (pos - pos.round()).abs().max_element();
    0.05 + between * 1.4
}

fn paint_ghost(surface: &mut dyn Surface, ghost: &Ghost) {
    let center = ghost.pos + 0.5;
    let body = if ghost.is_frightened() {
        FRIGHTENED
    } else {
        ghost_color(ghost.kind)
    };

    // Dome plus a ragged skirt
    surface.fill_arc(center, 0.45, PI, TAU, body);
    let left = center.x - 0.45;
    let mut skirt = vec![Vec2::new(left, center.y), Vec2::new(left + 0.9, center.y)];
    for i in 0..=6 {
        let x = left + 0.9 - i as f32 * 0.15;
        let y = center.y + if i % 2 == 0 { 0.45 } else { 0.3 };
        skirt.push(Vec2::new(x, y));
    }
    surface.fill_path(&skirt, body);

    let look = ghost.dir.offset().as_vec2() * 0.06;
    for side in [-0.16, 0.16] {
        let eye = center + Vec2::new(side, -0.08);
        surface.fill_circle(eye, 0.11, Color::WHITE);
        if !ghost.is_frightened() {
            surface.fill_circle(eye + look, 0.05, PUPIL);
        }
    }
}

pub fn paint(surface: &mut dyn Surface, state: &PacmanState, phase: Phase) {
    surface.clear(BACKGROUND);
    let cells = IVec2::new(state.maze.width(), state.maze.height());

    with_board(surface, cells, |s| {
        for (pos, tile) in state.maze.grid.iter() {
            let cell = pos.as_vec2();
            match tile {
                Tile::Wall => s.fill_rect(cell + 0.1, Vec2::splat(0.8), WALL),
                Tile::Door => s.fill_rect(cell + Vec2::new(0.0, 0.4), Vec2::new(1.0, 0.2), DOOR),
                Tile::Dot => s.fill_circle(cell + 0.5, 0.1, DOT),
                Tile::Energizer => s.fill_circle(cell + 0.5, 0.3, ENERGIZER),
                Tile::Empty => {}
            }
        }

        let player = &state.player;
        let color = match player.power() {
            Some(PowerUp::Energized | PowerUp::Invincible) => PLAYER_POWERED,
            None => PLAYER,
        };
        let facing = heading(player.dir);
        let mouth = mouth_angle(player.pos);
        s.fill_arc(player.pos + 0.5, 0.45, facing + mouth, facing + TAU - mouth, color);

        for ghost in &state.ghosts {
            paint_ghost(s, ghost);
        }

        paint_phase_overlay(s, cells, phase);
    });
}
