//! Top-level window enumeration via Win32.
//!
//! Produces the [`WindowSnapshot`] list discovery filters by title.  Only
//! windows a user could Alt+Tab to are reported: visible, titled, not a
//! tool window, not marked no-activate.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowLongW, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible,
    GWL_EXSTYLE, GWL_STYLE, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_VISIBLE,
};

use crate::errors::WinaimError;
use crate::provider::WindowSnapshot;

/// Read the window title into an owned string.
fn read_title(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buf[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

/// True for normal application windows the taskbar would show.
fn is_candidate(hwnd: HWND) -> bool {
    if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
        return false;
    }

    let style = unsafe { GetWindowLongW(hwnd, GWL_STYLE) } as u32;
    let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;

    if style & WS_VISIBLE.0 == 0 {
        return false;
    }
    if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
        return false;
    }
    if ex_style & WS_EX_NOACTIVATE.0 != 0 {
        return false;
    }

    true
}

/// Callback for `EnumWindows` that collects candidate handles.
unsafe extern "system" fn collect_candidates(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HWND>) };

    // Untitled windows cannot match any pattern, skip them here.
    if is_candidate(hwnd) && unsafe { GetWindowTextLengthW(hwnd) } > 0 {
        handles.push(hwnd);
    }

    TRUE // continue enumeration
}

/// Enumerate all visible, titled, Alt+Tab-eligible top-level windows.
pub fn list_windows() -> Result<Vec<WindowSnapshot>, WinaimError> {
    let mut handles: Vec<HWND> = Vec::with_capacity(64);
    let result = unsafe {
        EnumWindows(
            Some(collect_candidates),
            LPARAM(&mut handles as *mut Vec<HWND> as isize),
        )
    };
    result.map_err(|e| WinaimError::ComError(format!("EnumWindows failed: {e}")))?;

    Ok(handles
        .into_iter()
        .map(|hwnd| WindowSnapshot {
            handle: hwnd.0 as isize,
            title: read_title(hwnd),
        })
        .collect())
}
