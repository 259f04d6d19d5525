use tracing::debug;
use tracing::warn;
use widestring::U16CString;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

use super::convert::window_from_native;
use super::window_class_id::current_module;
use super::window_class_id::sandbox_window_class;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::model::WindowId;
use crate::platform::RawWindow;

/// A shown top-level window of the sandbox class. Destroyed on drop unless the
/// user closed it first.
pub struct NativeWindow {
    hwnd: HWND,
}

impl NativeWindow {
    /// Creates a window whose client area is `width` by `height`.
    pub fn create(title: &str, width: u32, height: u32) -> DxgiResult<Self> {
        let class = sandbox_window_class()?;
        let our_module = current_module()?;

        let mut window_rect = RECT {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        // Calculates the required size of the window rectangle, based on the desired size of the client rectangle.
        unsafe {
            AdjustWindowRectEx(&mut window_rect, WS_OVERLAPPEDWINDOW, false, WS_EX_CLIENTEDGE)
        }
        .call("AdjustWindowRectEx")?;

        let title = U16CString::from_str_truncate(title);
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_CLIENTEDGE,
                &class,
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                window_rect.right - window_rect.left,
                window_rect.bottom - window_rect.top,
                None,                    // no parent window
                None,                    // no menus
                Some(our_module.into()), // Use instance from GetModuleHandleExW
                None,
            )
        }
        .call("CreateWindowExW")?;

        unsafe {
            _ = ShowWindow(hwnd, SW_SHOW);
            _ = UpdateWindow(hwnd);
        }
        debug!(window = %window_from_native(hwnd), width, height, "window created");
        Ok(Self { hwnd })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl RawWindow for NativeWindow {
    fn id(&self) -> WindowId {
        window_from_native(self.hwnd)
    }
}

impl Drop for NativeWindow {
    fn drop(&mut self) {
        if !unsafe { IsWindow(Some(self.hwnd)) }.as_bool() {
            return;
        }
        if let Err(error) = unsafe { DestroyWindow(self.hwnd) } {
            warn!(%error, "DestroyWindow failed");
        }
    }
}
