use windows::Win32::UI::WindowsAndMessaging::*;

use super::last_error;
use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::presentation_loop::EventSource;

/// The calling thread's Win32 message queue. Ends at `WM_QUIT`.
#[derive(Debug, Default)]
pub struct MessagePump;

impl EventSource for MessagePump {
    type Event = MSG;

    fn next_event(&mut self) -> DxgiResult<Option<MSG>> {
        let mut message = MSG::default();
        match unsafe { GetMessageW(&mut message, None, 0, 0) }.0 {
            -1 => Err(DxgiError::from_status("GetMessageW", last_error())),
            0 => Ok(None),
            _ => Ok(Some(message)),
        }
    }

    fn dispatch(&mut self, message: &MSG) {
        unsafe {
            _ = TranslateMessage(message);
            DispatchMessageW(message);
        }
    }
}
