//! Boundary to the 2D drawing backend.

use super::Point;
use crate::util::color::Rgba;

/// Opaque handle of an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Immediate-mode drawing surface the view renders into.
pub trait RenderSink {
    fn line(&mut self, from: Point, to: Point, color: Rgba, thickness: f32);

    fn filled_rect(&mut self, min: Point, max: Point, color: Rgba);

    fn text(&mut self, position: Point, color: Rgba, text: &str);

    fn image(&mut self, texture: TextureId, min: Point, max: Point);

    /// Size of `text` when drawn with the current font.
    fn text_size(&self, text: &str) -> Point;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        thickness: f32,
    },
    FilledRect {
        min: Point,
        max: Point,
        color: Rgba,
    },
    Text {
        position: Point,
        color: Rgba,
        text: String,
    },
    Image {
        texture: TextureId,
        min: Point,
        max: Point,
    },
}

/// Recording sink with fixed-pitch glyph metrics.
#[derive(Debug, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    glyph_width: f32,
    line_height: f32,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(7.0, 13.0)
    }
}

impl DrawList {
    pub fn new(glyph_width: f32, line_height: f32) -> Self {
        Self {
            commands: Vec::new(),
            glyph_width,
            line_height,
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

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSink for DrawList {
    fn line(&mut self, from: Point, to: Point, color: Rgba, thickness: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    fn filled_rect(&mut self, min: Point, max: Point, color: Rgba) {
        self.commands
            .push(DrawCommand::FilledRect { min, max, color });
    }

    fn text(&mut self, position: Point, color: Rgba, text: &str) {
        self.commands.push(DrawCommand::Text {
            position,
            color,
            text: text.to_owned(),
        });
    }

    fn image(&mut self, texture: TextureId, min: Point, max: Point) {
        self.commands
            .push(DrawCommand::Image { texture, min, max });
    }

    fn text_size(&self, text: &str) -> Point {
        Point::new(text.chars().count() as f32 * self.glyph_width, self.line_height)
    }
}
