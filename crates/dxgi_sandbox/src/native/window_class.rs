use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::COLOR_WINDOW;
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

use crate::error::DxgiResult;
use crate::error::StatusContext;

pub trait WindowClass {
    /// The name of the window class.
    const ID: PCWSTR;

    /// Returns true when the message was handled and needs no default processing.
    fn handle(window: HWND, message: u32, wparam: WPARAM) -> bool;
}

/// The sandbox window: closing it destroys it, destroying it ends the message loop.
pub struct SandboxWindowClass;

impl WindowClass for SandboxWindowClass {
    const ID: PCWSTR = w!("dxgi-sandbox");

    fn handle(window: HWND, message: u32, _wparam: WPARAM) -> bool {
        match message {
            WM_CLOSE => {
                if let Err(error) = unsafe { DestroyWindow(window) } {
                    warn!(%error, "DestroyWindow failed");
                }
                true
            }
            WM_DESTROY => {
                unsafe { PostQuitMessage(0) };
                true
            }
            _ => false,
        }
    }
}

pub fn create_window_class_struct<W: WindowClass>(instance: HMODULE) -> DxgiResult<WNDCLASSEXW> {
    // WNDCLASSEXW - https://learn.microsoft.com/en-us/windows/win32/api/winuser/ns-winuser-wndclassexw
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.call("LoadIconW")?;
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<W>),
        hInstance: instance.into(),
        hIcon: icon,
        hIconSm: icon,
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.call("LoadCursorW")?,
        hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut _),
        lpszClassName: W::ID,
        ..Default::default()
    };
    Ok(wc)
}

extern "system" fn wndproc<W: WindowClass>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // A panic must not unwind into the system.
    let handled = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        W::handle(window, message, wparam)
    }))
    .unwrap_or(false);
    if handled {
        LRESULT(0)
    } else {
        unsafe { DefWindowProcW(window, message, wparam, lparam) }
    }
}
