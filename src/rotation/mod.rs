//! Cursor rotation around the calibrated circle.
//!
//! While a direction key is held, a background worker advances an angle at
//! a fixed cadence and moves the cursor to the matching point on the rim.

pub mod controller;
pub mod task;

pub use controller::RotationController;
pub use task::{Direction, RotationSettings};
