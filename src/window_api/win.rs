use std::sync::Arc;

use anyhow::Result;
use tracing::error;
use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowTextW},
};

use super::WindowManager;

#[tracing::instrument]
pub fn get_active_title() -> Result<Option<Arc<str>>> {
    let window = unsafe { GetForegroundWindow() };

    // No foreground window is a legal state, for example on the lock screen.
    if window.is_invalid() {
        return Ok(None);
    }

    let mut text: [u16; 4096] = [0; 4096];
    let title = unsafe { get_window_title(window, &mut text) };
    Ok(Some(title.into()))
}

unsafe fn get_window_title(window_handle: HWND, text: &mut [u16]) -> String {
    let len = unsafe { GetWindowTextW(window_handle, text) };
    String::from_utf16_lossy(&text[..len as usize])
}

pub struct WindowsWindowManager {}

impl WindowsWindowManager {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WindowsWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for WindowsWindowManager {
    fn get_active_window_title(&mut self) -> Result<Option<Arc<str>>> {
        get_active_title().inspect_err(|e| error!("Failed to get active window {e:?}"))
    }
}
