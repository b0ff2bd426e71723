//! Swipe gestures.
//!
//! A gesture is tracked from the pointer going down to it going up. At the
//! end the displacement is classified by its dominant axis: vertical only
//! when |dy| is strictly larger than |dx|, horizontal otherwise.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::Direction;

/// Classify a displacement into a slide direction.
///
/// Returns `None` when the dominant axis moved less than `min_distance`
/// (a tap, or a gesture that came back to where it started).
pub fn classify_swipe(dx: f32, dy: f32, min_distance: f32) -> Option<Direction> {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay > ax {
        if ay < min_distance || ay == 0.0 {
            return None;
        }
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    } else {
        if ax < min_distance || ax == 0.0 {
            return None;
        }
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    }
}

/// Tracks a single pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    origin: Option<(f32, f32)>,
    last: (f32, f32),
    min_distance: f32,
    /// Horizontal displacement is multiplied by this before classifying.
    x_scale: f32,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            origin: None,
            last: (0.0, 0.0),
            min_distance,
            x_scale: 1.0,
        }
    }

    /// Tracker tuned for terminal cells, which are about twice as tall as wide.
    pub fn for_terminal() -> Self {
        Self::new(1.0).with_x_scale(0.5)
    }

    pub fn with_x_scale(mut self, x_scale: f32) -> Self {
        self.x_scale = x_scale;
        self
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Pointer went down. Any unfinished gesture is discarded.
    pub fn begin(&mut self, x: f32, y: f32) {
        self.origin = Some((x, y));
        self.last = (x, y);
    }

    /// Pointer moved while down. Ignored when no gesture is active.
    pub fn update(&mut self, x: f32, y: f32) {
        if self.origin.is_some() {
            self.last = (x, y);
        }
    }

    /// Pointer went up; classify the gesture and reset.
    pub fn end(&mut self) -> Option<Direction> {
        let (ox, oy) = self.origin.take()?;
        let dx = (self.last.0 - ox) * self.x_scale;
        let dy = self.last.1 - oy;
        classify_swipe(dx, dy, self.min_distance)
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    /// Feed a terminal mouse event; left-button drags become swipes.
    pub fn handle_mouse_event(&mut self, ev: MouseEvent) -> Option<Direction> {
        let (x, y) = (ev.column as f32, ev.row as f32);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.begin(x, y);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.update(x, y);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.update(x, y);
                self.end()
            }
            _ => None,
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(0.0)
    }
}
