//! Snake paint pass

use glam::{IVec2, Vec2};

use super::{Color, Surface, paint_phase_overlay, with_board};
use crate::controller::Phase;
use crate::sim::{Direction, FoodKind, SnakeState};

pub const BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x11);
pub const GRID: Color = Color::rgb(0x11, 0x11, 0x22);
pub const BODY: Color = Color::rgb(0x00, 0xFF, 0x00);
pub const OUTLINE: Color = Color::rgb(0x88, 0xFF, 0x88);
pub const FOOD: Color = Color::rgb(0xFF, 0x00, 0xFF);
pub const BONUS_FOOD: Color = Color::rgb(0xFF, 0xFF, 0x00);

const GRID_LINE: f32 = 0.04;
const SEGMENT_INSET: f32 = 0.05;

/// Eye centres inside the head cell, facing `dir`
fn eye_offsets(dir: Direction) -> [Vec2; 2] {
    let (near, far) = (0.25, 0.75);
    match dir {
        Direction::Up => [Vec2::new(near, near), Vec2::new(far, near)],
        Direction::Down => [Vec2::new(near, far), Vec2::new(far, far)],
        Direction::Left => [Vec2::new(near, near), Vec2::new(near, far)],
        Direction::Right => [Vec2::new(far, near), Vec2::new(far, far)],
    }
}

pub fn paint(surface: &mut dyn Surface, state: &SnakeState, phase: Phase) {
    surface.clear(BACKGROUND);
    let cells = IVec2::new(state.field.width(), state.field.height());
    let extent = cells.as_vec2();

    with_board(surface, cells, |s| {
        for x in 0..=cells.x {
            let min = Vec2::new(x as f32 - GRID_LINE * 0.5, 0.0);
            s.fill_rect(min, Vec2::new(GRID_LINE, extent.y), GRID);
        }
        for y in 0..=cells.y {
            let min = Vec2::new(0.0, y as f32 - GRID_LINE * 0.5);
            s.fill_rect(min, Vec2::new(extent.x, GRID_LINE), GRID);
        }

        if let Some(food) = state.food {
            let color = match food.kind {
                FoodKind::Regular => FOOD,
                FoodKind::Bonus => BONUS_FOOD,
            };
            s.fill_circle(food.pos.as_vec2() + 0.5, 0.4, color);
        }

        // Tail fades out, never below half opacity
        let len = state.body.len() as f32;
        let size = Vec2::splat(1.0 - 2.0 * SEGMENT_INSET);
        for (i, segment) in state.body.iter().enumerate() {
            let alpha = (1.0 - i as f32 / len).max(0.5);
            let min = segment.as_vec2() + SEGMENT_INSET;
            s.fill_rect(min, size, BODY.with_alpha(alpha));
            s.stroke_rect(min, size, OUTLINE, 0.05);
        }

        let head = state.head().as_vec2();
        for eye in eye_offsets(state.direction) {
            s.fill_circle(head + eye, 0.125, Color::WHITE);
            s.fill_circle(head + eye, 0.0625, Color::BLACK);
        }

        paint_phase_overlay(s, cells, phase);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::settings::SnakeSettings;
    use std::collections::VecDeque;

    #[test]
    fn test_paints_every_segment() {
        let mut state = SnakeState::new(&SnakeSettings::default());
        state.body = VecDeque::from([IVec2::new(5, 5), IVec2::new(4, 5), IVec2::new(3, 5)]);
        let mut list = DrawList::new(Vec2::new(400.0, 400.0));
        paint(&mut list, &state, Phase::Playing);

        assert_eq!(list.depth(), 0);
        assert_eq!(
            list.count(|c| matches!(c, DrawCommand::StrokeRect { .. })),
            3
        );
        assert_eq!(list.count_color(FOOD), 1);
        assert_eq!(list.count_color(Color::WHITE), 2);
        // Head fully opaque, tail clamped to half
        assert_eq!(list.count_color(BODY), 1);
        assert_eq!(list.count_color(BODY.with_alpha(0.5)), 1);
    }

    #[test]
    fn test_overlay_only_when_not_playing() {
        let state = SnakeState::new(&SnakeSettings::default());
        let mut playing = DrawList::new(Vec2::new(200.0, 200.0));
        paint(&mut playing, &state, Phase::Playing);
        let mut paused = DrawList::new(Vec2::new(200.0, 200.0));
        paint(&mut paused, &state, Phase::Paused);
        assert_eq!(paused.len(), playing.len() + 1);
    }

    #[test]
    fn test_eyes_face_heading() {
        let [a, b] = eye_offsets(Direction::Right);
        assert!(a.x > 0.5 && b.x > 0.5);
        let [a, b] = eye_offsets(Direction::Up);
        assert!(a.y < 0.5 && b.y < 0.5);
    }
}
