//! Two-click calibration state machine.
//!
//! Arming always starts over: the stored circle is discarded and the next
//! two left clicks define the center and then the radius. Clicks outside
//! those two steps are ignored.

use crate::calibration::coords::{radius_between, Circle, Point};
use crate::calibration::state::CalibrationState;

/// Owns the calibration state and the circle captured so far.
#[derive(Debug, Default)]
pub struct Calibrator {
    state: CalibrationState,
    center: Option<Point>,
    radius: Option<u32>,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// True once both center and radius are set.
    pub fn is_bound(&self) -> bool {
        self.state == CalibrationState::Bound
    }

    /// The calibrated circle, only while bound.
    pub fn circle(&self) -> Option<Circle> {
        if !self.is_bound() {
            return None;
        }
        Some(Circle {
            center: self.center?,
            radius: self.radius?,
        })
    }

    /// Clears any stored circle and waits for the center click.
    pub fn arm(&mut self) {
        self.center = None;
        self.radius = None;
        self.state = CalibrationState::AwaitingCenter;
    }

    /// Feeds a left click at `p`, returning the resulting state.
    pub fn pointer_down(&mut self, p: Point) -> CalibrationState {
        match self.state {
            CalibrationState::AwaitingCenter => {
                self.center = Some(p);
                self.state = CalibrationState::AwaitingRadius;
            }
            CalibrationState::AwaitingRadius => {
                if let Some(center) = self.center {
                    self.radius = Some(radius_between(center, p));
                    self.state = CalibrationState::Bound;
                }
            }
            CalibrationState::Idle | CalibrationState::Bound => {}
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let cal = Calibrator::new();
        assert_eq!(cal.state(), CalibrationState::Idle);
        assert!(cal.circle().is_none());
    }

    #[test]
    fn test_full_sequence_binds_circle() {
        let mut cal = Calibrator::new();
        cal.arm();
        assert_eq!(cal.state(), CalibrationState::AwaitingCenter);
        assert_eq!(
            cal.pointer_down(Point::new(100, 100)),
            CalibrationState::AwaitingRadius
        );
        assert!(cal.circle().is_none());
        assert_eq!(cal.pointer_down(Point::new(100, 200)), CalibrationState::Bound);

        let circle = cal.circle().unwrap();
        assert_eq!(circle.center, Point::new(100, 100));
        assert_eq!(circle.radius, 100);
    }

    #[test]
    fn test_radius_is_truncated_distance() {
        let mut cal = Calibrator::new();
        cal.arm();
        cal.pointer_down(Point::new(-10, -10));
        cal.pointer_down(Point::new(-12, -12));
        assert_eq!(cal.circle().unwrap().radius, 2);
    }

    #[test]
    fn test_clicks_ignored_when_idle() {
        let mut cal = Calibrator::new();
        assert_eq!(cal.pointer_down(Point::new(5, 5)), CalibrationState::Idle);
        assert_eq!(cal.pointer_down(Point::new(6, 6)), CalibrationState::Idle);
        assert!(cal.circle().is_none());
    }

    #[test]
    fn test_clicks_ignored_when_bound() {
        let mut cal = Calibrator::new();
        cal.arm();
        cal.pointer_down(Point::new(0, 0));
        cal.pointer_down(Point::new(30, 40));
        let before = cal.circle().unwrap();

        assert_eq!(cal.pointer_down(Point::new(500, 500)), CalibrationState::Bound);
        assert_eq!(cal.circle().unwrap(), before);
    }

    #[test]
    fn test_rearm_discards_circle_from_any_state() {
        let mut cal = Calibrator::new();
        cal.arm();
        cal.pointer_down(Point::new(0, 0));
        cal.pointer_down(Point::new(3, 4));
        assert!(cal.is_bound());

        cal.arm();
        assert_eq!(cal.state(), CalibrationState::AwaitingCenter);
        assert!(cal.circle().is_none());

        // Re-arming mid-sequence starts over too
        cal.pointer_down(Point::new(9, 9));
        cal.arm();
        assert_eq!(cal.state(), CalibrationState::AwaitingCenter);
        cal.pointer_down(Point::new(1, 1));
        cal.pointer_down(Point::new(1, 11));
        assert_eq!(
            cal.circle().unwrap(),
            Circle {
                center: Point::new(1, 1),
                radius: 10
            }
        );
    }
}
