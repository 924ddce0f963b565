//! Normalized pointer position shared between the pointer listener and the
//! frame update.

use std::cell::Cell;
use std::rc::Rc;

/// Pointer position in normalized device coordinates.
///
/// Both axes span [-1, 1]; `y` points up, so the top edge of the viewport is
/// `y = 1`. The center of the viewport is the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub const CENTER: Cursor = Cursor { x: 0.0, y: 0.0 };

    /// Builds a cursor, clamping both axes to [-1, 1]. NaN maps to 0.
    pub fn new(x: f32, y: f32) -> Self {
        let norm = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self {
            x: norm(x),
            y: norm(y),
        }
    }

    /// Normalizes a pointer position in viewport pixels.
    ///
    /// A degenerate viewport leaves the cursor centered.
    pub fn from_pointer(client_x: f32, client_y: f32, viewport_w: f32, viewport_h: f32) -> Self {
        if viewport_w <= 0.0 || viewport_h <= 0.0 {
            log::warn!("pointer event on {viewport_w}x{viewport_h} viewport ignored");
            return Self::CENTER;
        }
        Self::new(
            client_x / viewport_w * 2.0 - 1.0,
            -(client_y / viewport_h) * 2.0 + 1.0,
        )
    }
}

/// Shared, single-threaded cursor cell.
///
/// Written by the pointer listener, read by the frame update. Callbacks on
/// the host thread never overlap, so a plain `Cell` is enough.
#[derive(Debug, Clone, Default)]
pub struct CursorHandle(Rc<Cell<Cursor>>);

impl CursorHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Cursor {
        self.0.get()
    }

    pub fn set(&self, cursor: Cursor) {
        self.0.set(cursor);
    }
}
