//! Pointer input abstraction.
//!
//! Mouse and touch events are normalized into [`PointerEvent`]s and folded
//! into a per-frame [`Pointer`] state that sketches query.

use kurbo::Point;

/// A normalized event from any pointing device, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse down, touch start.
    Down { x: f64, y: f64 },
    /// Mouse move, touch move.
    Move { x: f64, y: f64 },
    /// Mouse up, touch end.
    Up { x: f64, y: f64 },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => Point::new(x, y),
        }
    }
}

/// Pointer state as seen by one frame.
///
/// `just_pressed` / `just_released` are edges: they stay set until the host
/// calls [`Pointer::end_frame`] after the frame has been updated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    position: Option<Point>,
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: PointerEvent) {
        self.position = Some(event.position());
        match event {
            PointerEvent::Down { .. } => {
                self.pressed = true;
                self.just_pressed = true;
            }
            PointerEvent::Move { .. } => {}
            PointerEvent::Up { .. } => {
                if self.pressed {
                    self.just_released = true;
                }
                self.pressed = false;
            }
        }
    }

    /// Clear the edge flags. Call once per frame, after updating.
    pub fn end_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }

    /// Last known position; `None` until the first event arrives.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn has_started(&self) -> bool {
        self.position.is_some()
    }

    /// Held down right now.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Went down since the last frame.
    pub fn just_pressed(&self) -> bool {
        self.just_pressed
    }

    /// Went up since the last frame.
    pub fn just_released(&self) -> bool {
        self.just_released
    }
}
