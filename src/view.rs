//! Spectral view engine: geometry, interaction and drawing of the FFT trace,
//! the waterfall history, VFO overlays and band plan rows.

pub mod axis;
pub mod input;
pub mod layout;
pub mod meter;
pub mod overlay;
pub mod palette;
pub mod projector;
pub mod sink;
pub mod theme;
pub mod vfo;
pub mod waterfall;
pub mod window;

pub use input::{InputState, Key};
pub use palette::PaletteMapper;
pub use projector::FrequencyProjector;
pub use sink::{DrawCommand, DrawList, RenderSink};
pub use vfo::{Reference, Vfo};
pub use waterfall::{Tooltip, ViewEvent, WaterfallView};
pub use window::ViewWindow;

/// Screen-space position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strictly inside on both axes.
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }

    /// Half-open containment, used for hover tests.
    pub fn hovers(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}
