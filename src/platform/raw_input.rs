//! Raw keyboard and mouse input.

use anyhow::{Context, Result};
use std::mem::size_of;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::{
    GetRawInputData, RegisterRawInputDevices, HRAWINPUT, RAWINPUT, RAWINPUTDEVICE,
    RAWINPUTHEADER, RAWKEYBOARD, RAWMOUSE, RIDEV_INPUTSINK, RIDEV_NOLEGACY, RID_INPUT,
    RIM_TYPEKEYBOARD, RIM_TYPEMOUSE,
};
use windows::Win32::UI::WindowsAndMessaging::{WM_KEYDOWN, WM_KEYUP};

/// A decoded `WM_INPUT` payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawEvent {
    Key { vkey: u16, is_down: bool },
    MouseButtons { flags: u16 },
}

/// Registers for raw mouse and keyboard input delivered to `hwnd`, even when unfocused.
pub fn register_raw_input(hwnd: HWND) -> Result<()> {
    let devices = [
        RAWINPUTDEVICE {
            usUsagePage: 0x01, // Generic Desktop Controls
            usUsage: 0x02,     // Mouse
            dwFlags: RIDEV_INPUTSINK | RIDEV_NOLEGACY,
            hwndTarget: hwnd,
        },
        RAWINPUTDEVICE {
            usUsagePage: 0x01,
            usUsage: 0x06, // Keyboard
            dwFlags: RIDEV_INPUTSINK | RIDEV_NOLEGACY,
            hwndTarget: hwnd,
        },
    ];

    unsafe {
        RegisterRawInputDevices(&devices, size_of::<RAWINPUTDEVICE>() as u32)
            .context("Unable to register raw input devices")?;
    }
    Ok(())
}

/// Reads and decodes the raw input behind a `WM_INPUT` message.
///
/// Returns `None` for payloads that are malformed or of no interest.
///
/// # Safety
/// `hrawinput` must come from the `LPARAM` of a `WM_INPUT` message being handled.
pub unsafe fn read_raw_input(hrawinput: HRAWINPUT) -> Option<RawEvent> {
    let header_size = size_of::<RAWINPUTHEADER>() as u32;

    let mut size: u32 = 0;
    unsafe {
        GetRawInputData(hrawinput, RID_INPUT, None, &mut size, header_size);
    }
    if (size as usize) < size_of::<RAWINPUTHEADER>() {
        crate::log(&format!("Raw input dropped: payload of {} bytes", size));
        return None;
    }

    // u64 backing keeps the buffer aligned for RAWINPUT, and it is never
    // smaller than a full RAWINPUT even for short payloads
    let capacity = (size as usize).max(size_of::<RAWINPUT>());
    let mut buffer = vec![0u64; capacity.div_ceil(size_of::<u64>())];
    let copied = unsafe {
        GetRawInputData(
            hrawinput,
            RID_INPUT,
            Some(buffer.as_mut_ptr() as *mut _),
            &mut size,
            header_size,
        )
    };
    if copied != size {
        crate::log("GetRawInputData did not return correct size");
        return None;
    }

    let raw = unsafe { &*(buffer.as_ptr() as *const RAWINPUT) };
    let payload = size as usize - size_of::<RAWINPUTHEADER>();

    if raw.header.dwType == RIM_TYPEKEYBOARD.0 {
        if payload < size_of::<RAWKEYBOARD>() {
            crate::log("Raw keyboard input dropped: undersized payload");
            return None;
        }
        let kb = unsafe { &raw.data.keyboard };
        let is_down = match kb.Message {
            WM_KEYDOWN => true,
            WM_KEYUP => false,
            _ => return None,
        };
        Some(RawEvent::Key {
            vkey: kb.VKey,
            is_down,
        })
    } else if raw.header.dwType == RIM_TYPEMOUSE.0 {
        if payload < size_of::<RAWMOUSE>() {
            crate::log("Raw mouse input dropped: undersized payload");
            return None;
        }
        let flags = unsafe { raw.data.mouse.Anonymous.Anonymous.usButtonFlags };
        Some(RawEvent::MouseButtons { flags })
    } else {
        None
    }
}
