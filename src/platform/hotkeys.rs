//! Global Alt+key hotkeys.

use anyhow::{Context, Result};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, MOD_ALT, MOD_NOREPEAT,
};

use crate::config::AppConfig;
use crate::router::{HOTKEY_ARM, HOTKEY_QUIT};

fn key_name(vk: u16) -> String {
    match char::from_u32(vk as u32) {
        Some(c) if c.is_ascii_alphanumeric() => c.to_string(),
        _ => format!("0x{:02X}", vk),
    }
}

/// Registers the quit and calibration hotkeys on `hwnd`.
///
/// If the second registration fails the first one is released again.
pub fn register_hotkeys(hwnd: HWND, config: &AppConfig) -> Result<()> {
    let quit = key_name(config.quit_hotkey_key);
    let arm = key_name(config.arm_hotkey_key);

    unsafe {
        RegisterHotKey(
            hwnd,
            HOTKEY_QUIT,
            MOD_ALT | MOD_NOREPEAT,
            config.quit_hotkey_key as u32,
        )
        .with_context(|| format!("ALT+{} hotkey registration failed", quit))?;

        if let Err(e) = RegisterHotKey(
            hwnd,
            HOTKEY_ARM,
            MOD_ALT | MOD_NOREPEAT,
            config.arm_hotkey_key as u32,
        ) {
            let _ = UnregisterHotKey(hwnd, HOTKEY_QUIT);
            return Err(e).with_context(|| format!("ALT+{} hotkey registration failed", arm));
        }
    }

    crate::log(&format!("Hotkey: Alt+{} (quit)", quit));
    crate::log(&format!("Hotkey: Alt+{} (define circle: center click, then rim click)", arm));
    Ok(())
}

pub fn unregister_hotkeys(hwnd: HWND) {
    unsafe {
        let _ = UnregisterHotKey(hwnd, HOTKEY_ARM);
        let _ = UnregisterHotKey(hwnd, HOTKEY_QUIT);
    }
}
