//! Routes host input notifications to calibration and rotation.
//!
//! The host's window procedure calls these handlers synchronously. None of
//! them wait on the rotation cadence.

use std::sync::Arc;

use crate::calibration::{CalibrationState, Calibrator};
use crate::config::AppConfig;
use crate::cursor::CursorDevice;
use crate::rotation::{Direction, RotationController};

/// Hotkey ID for Alt+R (arm calibration).
pub const HOTKEY_ARM: i32 = 6030;
/// Hotkey ID for Alt+Q (quit).
pub const HOTKEY_QUIT: i32 = 6031;

/// Raw mouse button flag for a left button press.
pub const LEFT_BUTTON_DOWN: u16 = 0x0001;

/// What the host should do after a hotkey.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotkeyOutcome {
    Continue,
    Quit,
}

/// The application context: calibration, rotation and key bindings.
pub struct EventRouter {
    calibration: Calibrator,
    rotation: RotationController,
    cursor: Arc<dyn CursorDevice>,
    left_key: u16,
    right_key: u16,
}

impl EventRouter {
    pub fn new(config: &AppConfig, cursor: Arc<dyn CursorDevice>) -> Self {
        Self {
            calibration: Calibrator::new(),
            rotation: RotationController::new(Arc::clone(&cursor), config.rotation_settings()),
            cursor,
            left_key: config.left_key,
            right_key: config.right_key,
        }
    }

    #[cfg(test)]
    pub fn calibration(&self) -> &Calibrator {
        &self.calibration
    }

    #[cfg(test)]
    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    pub fn handle_hotkey(&mut self, id: i32) -> HotkeyOutcome {
        match id {
            HOTKEY_ARM => {
                crate::log("Calibration hotkey pressed");
                self.rotation.on_calibration_rearmed();
                self.calibration.arm();
                self.log_calibration_state();
                HotkeyOutcome::Continue
            }
            HOTKEY_QUIT => {
                crate::log("Quit hotkey pressed");
                HotkeyOutcome::Quit
            }
            _ => HotkeyOutcome::Continue,
        }
    }

    pub fn handle_key_event(&mut self, vkey: u16, is_down: bool) {
        if !self.calibration.is_bound() {
            return;
        }

        let direction = if vkey == self.left_key {
            Direction::Left
        } else if vkey == self.right_key {
            Direction::Right
        } else {
            return;
        };

        if is_down {
            self.rotation
                .on_direction_key_down(self.calibration.circle(), direction);
        } else {
            self.rotation.on_direction_key_up();
        }
    }

    pub fn handle_mouse_button_event(&mut self, button_flags: u16) {
        if button_flags != LEFT_BUTTON_DOWN {
            return;
        }
        if !matches!(
            self.calibration.state(),
            CalibrationState::AwaitingCenter | CalibrationState::AwaitingRadius
        ) {
            return;
        }

        let pos = match self.cursor.position() {
            Ok(pos) => pos,
            Err(e) => {
                crate::log(&format!("Click dropped, cursor position unavailable: {:#}", e));
                return;
            }
        };

        match self.calibration.pointer_down(pos) {
            CalibrationState::AwaitingRadius => {
                crate::log(&format!("Center set to {}", pos));
                self.log_calibration_state();
            }
            CalibrationState::Bound => {
                if let Some(circle) = self.calibration.circle() {
                    crate::log(&format!(
                        "Radius set to {} (center {})",
                        circle.radius, circle.center
                    ));
                }
                self.log_calibration_state();
            }
            _ => {}
        }
    }

    fn log_calibration_state(&self) {
        let state = self.calibration.state();
        crate::log(&format!("Calibration: {} - {}", state, state.description()));
    }

    /// Stops any running rotation and waits for it to exit.
    pub fn shutdown(&mut self) {
        self.rotation.shutdown();
    }
}
