//! Recording cursor for unit tests.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::calibration::Point;
use crate::cursor::CursorDevice;

/// A [`CursorDevice`] that stores its position in memory and records every move.
pub struct MockCursor {
    position: Mutex<Point>,
    moves: Mutex<Vec<Point>>,
    fail_reads: AtomicBool,
    fail_moves: AtomicBool,
}

impl MockCursor {
    pub fn new(start: Point) -> Self {
        Self {
            position: Mutex::new(start),
            moves: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_moves: AtomicBool::new(false),
        }
    }

    /// Places the cursor without recording a move, as if the user moved the mouse.
    pub fn place(&self, p: Point) {
        *self.position.lock().expect("lock poisoned") = p;
    }

    /// Makes `position()` fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes `set_position()` fail until reset.
    pub fn fail_moves(&self, fail: bool) {
        self.fail_moves.store(fail, Ordering::SeqCst);
    }

    /// Every position set so far, in order.
    pub fn moves(&self) -> Vec<Point> {
        self.moves.lock().expect("lock poisoned").clone()
    }

    pub fn move_count(&self) -> usize {
        self.moves.lock().expect("lock poisoned").len()
    }

    /// Polls until at least `count` moves were recorded or `timeout` elapses.
    pub fn wait_for_moves(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.move_count() >= count {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        self.move_count() >= count
    }
}

impl CursorDevice for MockCursor {
    fn position(&self) -> Result<Point> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("cursor read refused"));
        }
        Ok(*self.position.lock().expect("lock poisoned"))
    }

    fn set_position(&self, p: Point) -> Result<()> {
        if self.fail_moves.load(Ordering::SeqCst) {
            return Err(anyhow!("cursor move refused"));
        }
        *self.position.lock().expect("lock poisoned") = p;
        self.moves.lock().expect("lock poisoned").push(p);
        Ok(())
    }
}
