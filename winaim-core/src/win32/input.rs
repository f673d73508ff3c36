//! Mouse click simulation via Win32 `SendInput`.
//!
//! Coordinates are normalised to the 0..65535 virtual-desktop space so
//! clicks land on the right pixel regardless of monitor layout.

use std::thread;
use std::time::Duration;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT,
    MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

use crate::errors::WinaimError;
use crate::geom::Point;
use crate::provider::MouseButton;

/// Pre-computed size of `INPUT` for `SendInput` calls.
const INPUT_SIZE: i32 = std::mem::size_of::<INPUT>() as i32;

/// Settle pause between cursor move and click, and again after the click,
/// so the target application sees hover state before the button events.
const CLICK_SETTLE: Duration = Duration::from_millis(50);

/// Flags for absolute mouse positioning on the virtual desktop.
const ABSOLUTE_MOVE: MOUSE_EVENT_FLAGS =
    MOUSE_EVENT_FLAGS(MOUSEEVENTF_ABSOLUTE.0 | MOUSEEVENTF_MOVE.0 | MOUSEEVENTF_VIRTUALDESK.0);

/// Query virtual screen origin and size (covers all monitors).
///
/// On multi-monitor setups where a monitor is left of or above the
/// primary, the origin can be negative.
fn screen_geometry() -> (i32, i32, i32, i32) {
    unsafe {
        let x = GetSystemMetrics(SM_XVIRTUALSCREEN);
        let y = GetSystemMetrics(SM_YVIRTUALSCREEN);
        let w = GetSystemMetrics(SM_CXVIRTUALSCREEN);
        let h = GetSystemMetrics(SM_CYVIRTUALSCREEN);
        // GetSystemMetrics returns 0 on failure
        if w > 0 && h > 0 {
            (x, y, w, h)
        } else {
            (0, 0, 1920, 1080)
        }
    }
}

/// Convert pixel coordinates to 0..65535 normalised virtual-desktop space
/// using the MSDN formula `((pixel - origin) * 65535) / (size - 1)`,
/// clamped to the valid range.
fn normalise(point: Point) -> (i32, i32) {
    let (origin_x, origin_y, screen_w, screen_h) = screen_geometry();

    if screen_w <= 1 || screen_h <= 1 {
        return (0, 0);
    }

    let abs_x =
        (((point.x - origin_x) as i64 * 65535) / (screen_w as i64 - 1)).clamp(0, 65535) as i32;
    let abs_y =
        (((point.y - origin_y) as i64 * 65535) / (screen_h as i64 - 1)).clamp(0, 65535) as i32;
    (abs_x, abs_y)
}

fn mouse_input(abs_x: i32, abs_y: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: abs_x,
                dy: abs_y,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Move the cursor onto `point`, settle, then press and release `button`.
pub fn click_at(point: Point, button: MouseButton) -> Result<(), WinaimError> {
    let (abs_x, abs_y) = normalise(point);

    let (down_flag, up_flag) = match button {
        MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
        MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
    };

    let moved = unsafe { SendInput(&[mouse_input(abs_x, abs_y, ABSOLUTE_MOVE)], INPUT_SIZE) };
    if moved == 0 {
        return Err(WinaimError::InputError(
            "SendInput rejected the cursor move".to_owned(),
        ));
    }
    thread::sleep(CLICK_SETTLE);

    let inputs = [
        mouse_input(abs_x, abs_y, MOUSE_EVENT_FLAGS(ABSOLUTE_MOVE.0 | down_flag.0)),
        mouse_input(abs_x, abs_y, MOUSE_EVENT_FLAGS(ABSOLUTE_MOVE.0 | up_flag.0)),
    ];
    let sent = unsafe { SendInput(&inputs, INPUT_SIZE) };
    if sent != inputs.len() as u32 {
        return Err(WinaimError::InputError(format!(
            "SendInput injected {sent} of {} click events",
            inputs.len()
        )));
    }
    thread::sleep(CLICK_SETTLE);

    Ok(())
}
