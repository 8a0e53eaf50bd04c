//! Render passes
//!
//! Painting is a pure function of simulation state onto a [`Surface`].
//! Paint passes work in cell units under a single board transform; the
//! surface backend decides what a unit is in pixels.

pub mod draw_list;
pub mod pacman;
pub mod snake;
pub mod tetris;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2d;
pub use draw_list::{DrawCommand, DrawList};

use glam::{IVec2, Vec2};

use crate::controller::Phase;

/// Straight RGB plus alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Minimal 2D drawing target
pub trait Surface {
    /// Drawable area in surface units
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Color, line_width: f32);
    /// Pie wedge from `start` to `end` radians, clockwise in screen space
    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);
    /// Closed polygon
    fn fill_path(&mut self, points: &[Vec2], color: Color);
    fn push_transform(&mut self, translate: Vec2, scale: f32);
    fn pop_transform(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_arc(center, radius, 0.0, std::f32::consts::TAU, color);
    }
}

/// Largest whole-board scale that fits, centred
pub fn board_transform(surface: Vec2, cells: IVec2) -> (Vec2, f32) {
    let cells = cells.max(IVec2::ONE).as_vec2();
    let scale = (surface / cells).min_element().max(0.0);
    let offset = (surface - cells * scale) * 0.5;
    (offset, scale)
}

/// Run `paint` in cell units for a `cells`-sized board
pub fn with_board(surface: &mut dyn Surface, cells: IVec2, paint: impl FnOnce(&mut dyn Surface)) {
    let (offset, scale) = board_transform(surface.size(), cells);
    surface.push_transform(offset, scale);
    paint(&mut *surface);
    surface.pop_transform();
}

/// Dim the board while the game is not running
pub fn paint_phase_overlay(surface: &mut dyn Surface, cells: IVec2, phase: Phase) {
    let alpha = match phase {
        Phase::Playing => return,
        Phase::LevelComplete => 0.25,
        Phase::Idle | Phase::Paused => 0.5,
        Phase::GameOver => 0.7,
    };
    surface.fill_rect(Vec2::ZERO, cells.as_vec2(), Color::BLACK.with_alpha(alpha));
}
