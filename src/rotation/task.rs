//! A single rotation run: angle stepping and the worker loop.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::calibration::{angle_from_center, point_on_circle, Circle, Point};
use crate::cursor::CursorDevice;

/// Which way the cursor travels around the circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Decreasing angle (counter-clockwise on screen, where y grows downward).
    Left,
    /// Increasing angle (clockwise on screen).
    Right,
}

impl Direction {
    /// Sign applied to the angle step.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// Default pause between two steps (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 20;

/// Default angle advanced per step: half of 0.1745 rad.
pub const DEFAULT_ANGLE_STEP_RAD: f64 = 0.1745 / 2.0;

/// Timing of the rotation loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSettings {
    /// Pause between two steps.
    pub tick_interval: Duration,
    /// Radians advanced per step.
    pub angle_step: f64,
}

/// Angle state of one rotation. Starts from wherever the cursor currently is.
#[derive(Clone, Debug)]
pub struct RotationTask {
    circle: Circle,
    direction: Direction,
    angle_step: f64,
    angle: f64,
}

impl RotationTask {
    pub fn new(circle: Circle, direction: Direction, angle_step: f64, cursor: Point) -> Self {
        Self {
            circle,
            direction,
            angle_step,
            angle: angle_from_center(circle.center, cursor),
        }
    }

    /// Current angle in radians. Not normalized.
    #[cfg(test)]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Advances one step and returns where the cursor should go.
    pub fn advance(&mut self) -> Point {
        self.angle += self.direction.sign() * self.angle_step;
        point_on_circle(self.circle, self.angle)
    }
}

/// Run flag shared between the controller and one worker.
///
/// The worker holds the lock while it checks the flag and moves the cursor,
/// so once [`RunFlag::stop`] returns no further move can happen. Stopping
/// also wakes a worker that is waiting out its tick.
#[derive(Debug)]
pub(crate) struct RunFlag {
    running: Mutex<bool>,
    wake: Condvar,
}

impl RunFlag {
    pub(crate) fn new() -> Self {
        Self {
            running: Mutex::new(true),
            wake: Condvar::new(),
        }
    }

    pub(crate) fn stop(&self) {
        match self.running.lock() {
            Ok(mut running) => *running = false,
            Err(poisoned) => *poisoned.into_inner() = false,
        }
        self.wake.notify_all();
    }
}

/// Runs `task` until `flag` is stopped.
pub(crate) fn run_rotation_loop(
    mut task: RotationTask,
    cursor: Arc<dyn CursorDevice>,
    flag: Arc<RunFlag>,
    tick_interval: Duration,
    task_id: u64,
) {
    let mut reported_failure = false;

    let Ok(mut guard) = flag.running.lock() else {
        return;
    };

    while *guard {
        let target = task.advance();
        if let Err(e) = cursor.set_position(target) {
            // Skip the tick; only the first failure of a run is worth logging
            if !reported_failure {
                crate::log(&format!(
                    "Rotation #{}: failed to move cursor to {}: {}",
                    task_id, target, e
                ));
                reported_failure = true;
            }
        }

        // Releases the lock while waiting; returns early once stopped
        guard = match flag
            .wake
            .wait_timeout_while(guard, tick_interval, |running| *running)
        {
            Ok((guard, _)) => guard,
            Err(_) => return,
        };
    }
}
