//! Mouse Rotation
//!
//! A small Windows utility that turns two held keys into circular mouse
//! movement. Alt+R arms calibration: the next left click marks the circle's
//! center and the one after that a point on its rim. Once the circle is
//! set, holding A or D drives the cursor around it until the key is
//! released. Alt+Q quits.

// Hide console window on Windows
#![windows_subsystem = "windows"]
// The core only has callers through the Win32 host
#![cfg_attr(not(windows), allow(dead_code))]

mod calibration;
mod config;
mod cursor;
#[cfg(windows)]
mod platform;
mod paths;
mod rotation;
mod router;

use anyhow::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths::get_log_file())
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let thread = std::thread::current();
        log(&format!(
            "[PANIC] thread '{}'{} {}",
            thread.name().unwrap_or("<unnamed>"),
            location,
            msg
        ));
    }));
}

fn main() -> Result<()> {
    install_panic_hook();

    if let Err(e) = paths::ensure_directories() {
        eprintln!("Warning: could not create logs directory: {}", e);
    }

    config::init_config();
    let config = config::get_config();

    run(config)
}

#[cfg(windows)]
fn run(config: &config::AppConfig) -> Result<()> {
    if let Err(e) = platform::run(config) {
        log(&format!("Fatal: {:#}", e));
        platform::show_error(&format!("ERROR: {:#}", e));
        return Err(e);
    }
    Ok(())
}

#[cfg(not(windows))]
fn run(_config: &config::AppConfig) -> Result<()> {
    log("Global hotkeys and raw input are only available on Windows");
    Err(anyhow::anyhow!("unsupported platform"))
}
