//! Lifecycle of the single rotation worker.
//!
//! At most one rotation runs at a time. The first direction key pressed
//! wins; any direction key release, a calibration re-arm or shutdown stops
//! it. Stopping only clears the run flag and never waits for the worker,
//! so the event thread stays responsive.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::calibration::Circle;
use crate::cursor::CursorDevice;
use crate::rotation::task::{
    run_rotation_loop, Direction, RotationSettings, RotationTask, RunFlag,
};

/// Handle to the running worker.
struct ActiveRotation {
    id: u64,
    direction: Direction,
    flag: Arc<RunFlag>,
    handle: JoinHandle<()>,
}

/// Owns the rotation slot.
pub struct RotationController {
    cursor: Arc<dyn CursorDevice>,
    settings: RotationSettings,
    active: Option<ActiveRotation>,
    /// Stopped workers that may not have exited yet.
    finished: Vec<JoinHandle<()>>,
    next_id: u64,
}

impl RotationController {
    pub fn new(cursor: Arc<dyn CursorDevice>, settings: RotationSettings) -> Self {
        Self {
            cursor,
            settings,
            active: None,
            finished: Vec::new(),
            next_id: 1,
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub fn active_direction(&self) -> Option<Direction> {
        self.active.as_ref().map(|a| a.direction)
    }

    /// Identifier of the running worker, unique for the controller's lifetime.
    #[cfg(test)]
    pub fn active_task_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Starts rotating around `circle` unless a rotation is already running.
    ///
    /// `circle` is `None` while calibration is incomplete, in which case
    /// nothing happens. Returns whether a new rotation was started.
    pub fn on_direction_key_down(&mut self, circle: Option<Circle>, direction: Direction) -> bool {
        let Some(circle) = circle else {
            return false;
        };
        if self.active.is_some() {
            return false;
        }

        match self.spawn(circle, direction) {
            Ok(active) => {
                crate::log(&format!(
                    "Rotation #{} started ({}) around {} r={}",
                    active.id, direction, circle.center, circle.radius
                ));
                self.active = Some(active);
                true
            }
            Err(e) => {
                crate::log(&format!("Rotation not started: {:#}", e));
                false
            }
        }
    }

    /// Stops the running rotation, whichever key started it.
    pub fn on_direction_key_up(&mut self) {
        self.stop_active("key released");
    }

    /// Stops the running rotation because the circle is being redefined.
    pub fn on_calibration_rearmed(&mut self) {
        self.stop_active("calibration re-armed");
    }

    /// Stops any rotation and waits for every worker to exit.
    pub fn shutdown(&mut self) {
        self.stop_active("shutdown");
        for handle in self.finished.drain(..) {
            if handle.join().is_err() {
                crate::log("Rotation worker panicked");
            }
        }
    }

    fn stop_active(&mut self, reason: &str) {
        // Reap workers that already exited so the list stays short
        self.finished.retain(|h| !h.is_finished());

        if let Some(active) = self.active.take() {
            active.flag.stop();
            crate::log(&format!("Rotation #{} stopped ({})", active.id, reason));
            self.finished.push(active.handle);
        }
    }

    fn spawn(&mut self, circle: Circle, direction: Direction) -> Result<ActiveRotation> {
        let start = self
            .cursor
            .position()
            .context("could not read starting cursor position")?;

        let id = self.next_id;
        self.next_id += 1;

        let task = RotationTask::new(circle, direction, self.settings.angle_step, start);
        let flag = Arc::new(RunFlag::new());
        let cursor = Arc::clone(&self.cursor);
        let tick_interval = self.settings.tick_interval;
        let worker_flag = Arc::clone(&flag);

        let handle = thread::Builder::new()
            .name(format!("rotation-{}", id))
            .spawn(move || run_rotation_loop(task, cursor, worker_flag, tick_interval, id))
            .context("failed to spawn rotation thread")?;

        Ok(ActiveRotation {
            id,
            direction,
            flag,
            handle,
        })
    }
}

impl Drop for RotationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Point;
    use crate::cursor::mock::MockCursor;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    fn fast_settings() -> RotationSettings {
        RotationSettings {
            tick_interval: Duration::from_millis(2),
            angle_step: 0.08725,
        }
    }

    fn circle() -> Circle {
        Circle {
            center: Point::new(0, 0),
            radius: 50,
        }
    }

    fn setup() -> (Arc<MockCursor>, RotationController) {
        let cursor = Arc::new(MockCursor::new(Point::new(50, 0)));
        let controller = RotationController::new(cursor.clone(), fast_settings());
        (cursor, controller)
    }

    #[test]
    fn test_no_rotation_without_circle() {
        let (cursor, mut controller) = setup();
        assert!(!controller.on_direction_key_down(None, Direction::Right));
        assert!(!controller.is_active());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cursor.move_count(), 0);
    }

    #[test]
    fn test_first_tick_position() {
        let (cursor, mut controller) = setup();
        assert!(controller.on_direction_key_down(Some(circle()), Direction::Right));
        assert_eq!(controller.active_direction(), Some(Direction::Right));

        assert!(cursor.wait_for_moves(1, WAIT));
        assert_eq!(cursor.moves()[0], Point::new(49, 4));
        controller.shutdown();
    }

    #[test]
    fn test_left_moves_the_other_way() {
        let (cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Left);
        assert!(cursor.wait_for_moves(1, WAIT));
        assert_eq!(cursor.moves()[0], Point::new(49, -4));
        controller.shutdown();
    }

    #[test]
    fn test_second_key_down_is_ignored() {
        let (cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Left);
        let id = controller.active_task_id();
        assert!(id.is_some());

        assert!(!controller.on_direction_key_down(Some(circle()), Direction::Right));
        assert_eq!(controller.active_task_id(), id);
        assert_eq!(controller.active_direction(), Some(Direction::Left));

        // Still heading left, so the first steps stay above the x axis on screen
        assert!(cursor.wait_for_moves(3, WAIT));
        assert!(cursor.moves()[..3].iter().all(|p| p.y <= 0));
        controller.shutdown();
    }

    #[test]
    fn test_key_up_stops_and_no_more_moves() {
        let (cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        assert!(cursor.wait_for_moves(2, WAIT));

        controller.on_direction_key_up();
        assert!(!controller.is_active());
        let count = cursor.move_count();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cursor.move_count(), count);
    }

    #[test]
    fn test_repeated_key_up_is_noop() {
        let (_cursor, mut controller) = setup();
        controller.on_direction_key_up();
        controller.on_direction_key_up();
        assert!(!controller.is_active());

        controller.on_direction_key_down(Some(circle()), Direction::Right);
        controller.on_direction_key_up();
        controller.on_direction_key_up();
        assert!(!controller.is_active());
    }

    #[test]
    fn test_rearm_stops_rotation() {
        let (_cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        assert!(controller.is_active());
        controller.on_calibration_rearmed();
        assert!(!controller.is_active());
    }

    #[test]
    fn test_restart_gets_new_id_and_resumes_from_cursor() {
        let (cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        let first = controller.active_task_id().unwrap();
        controller.on_direction_key_up();

        // User moved the mouse to the bottom of the circle meanwhile
        cursor.place(Point::new(0, 50));
        let before = cursor.move_count();
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        let second = controller.active_task_id().unwrap();
        assert_ne!(first, second);

        assert!(cursor.wait_for_moves(before + 1, WAIT));
        // pi/2 + step: x = 50*cos(1.658) = -4.35 -> -4, y = 49.8 -> 49
        assert_eq!(cursor.moves()[before], Point::new(-4, 49));
        controller.shutdown();
    }

    #[test]
    fn test_failed_cursor_read_aborts_start() {
        let (cursor, mut controller) = setup();
        cursor.fail_reads(true);
        assert!(!controller.on_direction_key_down(Some(circle()), Direction::Right));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_failed_moves_do_not_stop_loop() {
        let (cursor, mut controller) = setup();
        cursor.fail_moves(true);
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        std::thread::sleep(Duration::from_millis(20));
        assert!(controller.is_active());
        assert_eq!(cursor.move_count(), 0);

        cursor.fail_moves(false);
        assert!(cursor.wait_for_moves(1, WAIT));
        controller.shutdown();
    }

    #[test]
    fn test_drop_stops_worker() {
        let (cursor, mut controller) = setup();
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        assert!(cursor.wait_for_moves(1, WAIT));
        drop(controller);

        let count = cursor.move_count();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cursor.move_count(), count);
    }

    #[test]
    fn test_shutdown_does_not_wait_for_long_tick() {
        let cursor = Arc::new(MockCursor::new(Point::new(50, 0)));
        let settings = RotationSettings {
            tick_interval: Duration::from_secs(60),
            angle_step: 0.08725,
        };
        let mut controller = RotationController::new(cursor.clone(), settings);
        controller.on_direction_key_down(Some(circle()), Direction::Right);
        assert!(cursor.wait_for_moves(1, WAIT));

        let started = std::time::Instant::now();
        controller.shutdown();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(cursor.move_count(), 1);
    }
}
