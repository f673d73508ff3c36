//! The [`Desktop`] seam between orchestration and the OS.
//!
//! Everything above this trait (discovery loop, runner, reporting) is
//! platform-neutral and unit-testable; the `win32` module supplies the
//! real UI Automation implementation.

use crate::errors::WinaimError;
use crate::geom::{Point, Rect};
use crate::tree::TreeNode;

/// Owned snapshot of a top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub handle: isize,
    pub title: String,
}

/// What to look for inside a window: an exact control title plus a control
/// type tag such as `Button` or `Edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlQuery {
    pub title: String,
    pub control_type: String,
}

/// Outcome of resolving a [`ControlQuery`] inside one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLookup {
    /// No descendant matched the query.
    NotFound,
    /// A match was found; carries its screen rectangle.
    Found(Rect),
    /// A match was found but its geometry could not be read, typically
    /// because the element went away between lookup and read.
    Stale(String),
}

/// Mouse button used for synthetic clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a button name to a variant.  Unknown names fall back to `Left`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "right" => MouseButton::Right,
            "middle" => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// OS access used by the runner.
///
/// `resolve_control` returning `Err` means the window itself could not be
/// inspected (closed mid-run, access denied); the runner skips that window
/// and moves on.  A window that was inspected fine but holds no match
/// returns `Ok(ControlLookup::NotFound)` instead.
pub trait Desktop {
    /// Enumerate visible, titled, Alt+Tab-eligible top-level windows.
    fn windows(&self) -> Result<Vec<WindowSnapshot>, WinaimError>;

    /// Capture the full accessibility tree of one window.
    fn control_tree(&self, handle: isize) -> Result<TreeNode, WinaimError>;

    /// Search one window's descendants for the queried control.
    fn resolve_control(
        &self,
        handle: isize,
        query: &ControlQuery,
    ) -> Result<ControlLookup, WinaimError>;

    /// Click at a screen point with the given button.
    fn click(&self, point: Point, button: MouseButton) -> Result<(), WinaimError>;
}
