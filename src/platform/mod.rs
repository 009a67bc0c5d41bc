//! Win32 host: a message-only window that receives hotkeys and raw input
//! and forwards them to the [`EventRouter`].

pub mod hotkeys;
pub mod raw_input;

use anyhow::{anyhow, Context, Result};
use std::cell::RefCell;
use std::sync::Arc;

use windows::core::{w, HSTRING, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::HRAWINPUT;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, MessageBoxW,
    PostQuitMessage, RegisterClassW, TranslateMessage, UnregisterClassW, HWND_MESSAGE,
    MB_ICONERROR, MB_OK, MSG, WINDOW_EX_STYLE, WINDOW_STYLE, WM_DESTROY, WM_HOTKEY, WM_INPUT,
    WNDCLASSW,
};

use crate::config::AppConfig;
use crate::cursor::SystemCursor;
use crate::platform::raw_input::{read_raw_input, RawEvent};
use crate::router::{EventRouter, HotkeyOutcome};

fn class_name() -> PCWSTR {
    w!("MouseRotationHiddenWindow")
}

thread_local! {
    /// Router used by the window procedure; only touched on the message loop thread.
    static ROUTER: RefCell<Option<EventRouter>> = const { RefCell::new(None) };
}

/// Shows a blocking error dialog.
pub fn show_error(message: &str) {
    unsafe {
        let _ = MessageBoxW(
            None,
            &HSTRING::from(message),
            w!("ERROR!"),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// Sets up the hidden window, hotkeys and raw input, then pumps messages until quit.
pub fn run(config: &AppConfig) -> Result<()> {
    let hwnd = create_message_window()?;

    if let Err(e) = hotkeys::register_hotkeys(hwnd, config) {
        destroy_message_window(hwnd);
        return Err(e);
    }
    if let Err(e) = raw_input::register_raw_input(hwnd) {
        hotkeys::unregister_hotkeys(hwnd);
        destroy_message_window(hwnd);
        return Err(e);
    }

    let router = EventRouter::new(config, Arc::new(SystemCursor));
    ROUTER.with(|r| *r.borrow_mut() = Some(router));

    crate::log("Mouse rotation started");
    crate::log(&format!(
        "Hold 0x{:02X} / 0x{:02X} to rotate left / right once a circle is set",
        config.left_key, config.right_key
    ));

    // Message loop
    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Cleanup
    if let Some(mut router) = ROUTER.with(|r| r.borrow_mut().take()) {
        router.shutdown();
    }
    hotkeys::unregister_hotkeys(hwnd);
    destroy_message_window(hwnd);
    crate::log("Mouse rotation stopped");

    Ok(())
}

fn create_message_window() -> Result<HWND> {
    unsafe {
        let hinstance = GetModuleHandleW(None)?;

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            lpszClassName: class_name(),
            ..Default::default()
        };

        let atom = RegisterClassW(&wc);
        if atom == 0 {
            return Err(anyhow!("Window registration failed"));
        }

        // Message-only: never shown, still receives hotkeys and raw input
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name(),
            w!("MouseRotation"),
            WINDOW_STYLE::default(),
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            None,
            hinstance,
            None,
        );

        match hwnd {
            Ok(hwnd) => Ok(hwnd),
            Err(e) => {
                let _ = UnregisterClassW(class_name(), hinstance);
                Err(e).context("Window creation failed")
            }
        }
    }
}

fn destroy_message_window(hwnd: HWND) {
    unsafe {
        let _ = DestroyWindow(hwnd);
        if let Ok(hinstance) = GetModuleHandleW(None) {
            let _ = UnregisterClassW(class_name(), hinstance);
        }
    }
}

/// Runs `f` against the router if it is installed and not already borrowed.
fn with_router<R>(f: impl FnOnce(&mut EventRouter) -> R) -> Option<R> {
    ROUTER.with(|r| match r.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => None,
    })
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        match msg {
            WM_HOTKEY => {
                let hotkey_id = wparam.0 as i32;
                if with_router(|router| router.handle_hotkey(hotkey_id))
                    == Some(HotkeyOutcome::Quit)
                {
                    PostQuitMessage(0);
                }
                LRESULT(0)
            }
            WM_INPUT => {
                match read_raw_input(HRAWINPUT(lparam.0 as _)) {
                    Some(RawEvent::Key { vkey, is_down }) => {
                        with_router(|router| router.handle_key_event(vkey, is_down));
                    }
                    Some(RawEvent::MouseButtons { flags }) => {
                        with_router(|router| router.handle_mouse_button_event(flags));
                    }
                    None => {}
                }
                LRESULT(0)
            }
            WM_DESTROY => {
                with_router(|router| router.shutdown());
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
