//! Win32 cursor access.

use anyhow::{Context, Result};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::calibration::Point;
use crate::cursor::CursorDevice;

/// The desktop's real pointer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCursor;

impl CursorDevice for SystemCursor {
    fn position(&self) -> Result<Point> {
        let mut pt = POINT::default();
        unsafe {
            GetCursorPos(&mut pt).context("GetCursorPos failed")?;
        }
        Ok(Point::new(pt.x, pt.y))
    }

    fn set_position(&self, p: Point) -> Result<()> {
        unsafe {
            SetCursorPos(p.x, p.y).context("SetCursorPos failed")?;
        }
        Ok(())
    }
}
