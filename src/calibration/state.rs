//! Calibration state tracking.

/// Progress through the two-click circle calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalibrationState {
    /// Nothing armed since startup.
    #[default]
    Idle,
    /// Armed; the next left click sets the center.
    AwaitingCenter,
    /// Center set; the next left click sets the radius.
    AwaitingRadius,
    /// Center and radius set; rotation enabled.
    Bound,
}

impl CalibrationState {
    /// Returns a human-readable description of what the user should do next.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Press the calibration hotkey to define a circle",
            Self::AwaitingCenter => "Click the CENTER of the circle",
            Self::AwaitingRadius => "Click any point ON the circle to set the radius",
            Self::Bound => "Circle set - hold a direction key to rotate",
        }
    }
}

impl std::fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingCenter => write!(f, "Awaiting center"),
            Self::AwaitingRadius => write!(f, "Awaiting radius"),
            Self::Bound => write!(f, "Bound"),
        }
    }
}
