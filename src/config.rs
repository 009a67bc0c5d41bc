//! Runtime configuration.
//!
//! Loads optional settings from config.json next to the executable. Every
//! field has a default, so the tool behaves the same with no file at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::rotation::task::{DEFAULT_ANGLE_STEP_RAD, DEFAULT_TICK_INTERVAL_MS};
use crate::rotation::RotationSettings;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Virtual-key code of the `A` key.
pub const VK_A: u16 = 0x41;
/// Virtual-key code of the `D` key.
pub const VK_D: u16 = 0x44;
/// Virtual-key code of the `Q` key.
pub const VK_Q: u16 = 0x51;
/// Virtual-key code of the `R` key.
pub const VK_R: u16 = 0x52;

/// Complete application configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delay between two cursor steps (milliseconds)
    pub tick_interval_ms: u64,
    /// Angle advanced per step (radians)
    pub angle_step_rad: f64,
    /// Key that rotates counter-clockwise on screen
    pub left_key: u16,
    /// Key that rotates clockwise on screen
    pub right_key: u16,
    /// Key combined with Alt to arm calibration
    pub arm_hotkey_key: u16,
    /// Key combined with Alt to quit
    pub quit_hotkey_key: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            angle_step_rad: DEFAULT_ANGLE_STEP_RAD,
            left_key: VK_A,
            right_key: VK_D,
            arm_hotkey_key: VK_R,
            quit_hotkey_key: VK_Q,
        }
    }
}

impl AppConfig {
    /// Rotation timing derived from this configuration.
    pub fn rotation_settings(&self) -> RotationSettings {
        RotationSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            angle_step: self.angle_step_rad,
        }
    }
}

/// Loads configuration from `path` or returns defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if !path.exists() {
        crate::log("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                AppConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read config.json: {}. Using defaults.",
                e
            ));
            AppConfig::default()
        }
    }
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config_from(&crate::paths::get_config_path()));
}

/// Returns the global configuration, or defaults if `init_config` was never called.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}
