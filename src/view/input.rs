use super::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    PageUp,
    PageDown,
}

/// Pointer and keyboard state sampled once per frame by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub position: Point,
    /// Left button is held this frame.
    pub left_down: bool,
    /// Left button went down this frame.
    pub left_clicked: bool,
    /// Offset from where the current left drag started.
    pub drag_delta: Point,
    /// Wheel notches, positive away from the user.
    pub wheel: f32,
    /// Keys that produced a press (including repeats) this frame.
    pub keys: Vec<Key>,
    pub ctrl: bool,
}

impl InputState {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Where the current drag started.
    pub fn drag_origin(&self) -> Point {
        Point::new(
            self.position.x - self.drag_delta.x,
            self.position.y - self.drag_delta.y,
        )
    }
}
