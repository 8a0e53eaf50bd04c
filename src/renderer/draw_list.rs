//! Recording surface
//!
//! Stores draw calls instead of rasterising them. Used by the native demo
//! and by tests that inspect what a paint pass produced.

use glam::Vec2;

use super::{Color, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
    StrokeRect {
        min: Vec2,
        size: Vec2,
        color: Color,
        line_width: f32,
    },
    FillArc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
    },
    FillPath {
        points: Vec<Vec2>,
        color: Color,
    },
    PushTransform {
        translate: Vec2,
        scale: f32,
    },
    PopTransform,
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Transforms still pushed
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Fills drawn with exactly `color`
    pub fn count_color(&self, color: Color) -> usize {
        self.count(|c| match c {
            DrawCommand::FillRect { color: c, .. }
            | DrawCommand::FillArc { color: c, .. }
            | DrawCommand::FillPath { color: c, .. } => *c == color,
            _ => false,
        })
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { min, size, color });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            min,
            size,
            color,
            line_width,
        });
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn fill_path(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::FillPath {
            points: points.to_vec(),
            color,
        });
    }

    fn push_transform(&mut self, translate: Vec2, scale: f32) {
        self.depth += 1;
        self.commands
            .push(DrawCommand::PushTransform { translate, scale });
    }

    fn pop_transform(&mut self) {
        if self.depth == 0 {
            log::warn!("pop_transform without matching push");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::PopTransform);
    }
}
