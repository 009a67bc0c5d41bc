//! Access to the system cursor.
//!
//! The [`CursorDevice`] trait lets the rotation loop and the event router
//! run against a recording double in tests instead of the real pointer.

use anyhow::Result;

use crate::calibration::Point;

#[cfg(test)]
pub mod mock;

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::SystemCursor;

/// Reads and moves the pointer. Shared between the event thread and the rotation thread.
pub trait CursorDevice: Send + Sync {
    /// Current cursor position in screen coordinates.
    fn position(&self) -> Result<Point>;

    /// Moves the cursor to `p` in screen coordinates.
    fn set_position(&self, p: Point) -> Result<()>;
}
