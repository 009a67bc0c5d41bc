//! Circle calibration.
//!
//! After the calibration hotkey, the next two left clicks define the
//! circle's center and a point on its rim.

pub mod coords;
pub mod machine;
pub mod state;

pub use coords::{angle_from_center, point_on_circle, Circle, Point};
pub use machine::Calibrator;
pub use state::CalibrationState;
