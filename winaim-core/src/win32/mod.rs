//! Windows realisation of the [`Desktop`] trait.
//!
//! Window enumeration goes through Win32 `EnumWindows`, tree capture and
//! control resolution through UI Automation, clicks through `SendInput`.
//! Each operation initialises its own COM apartment, so [`UiaDesktop`]
//! itself holds no COM state and is freely movable across threads.

mod com;
mod control;
mod input;
mod tree;
mod window;

use crate::errors::WinaimError;
use crate::geom::Point;
use crate::provider::{ControlLookup, ControlQuery, Desktop, MouseButton, WindowSnapshot};
use crate::tree::TreeNode;

/// [`Desktop`] backed by Win32 window enumeration, UI Automation, and
/// `SendInput`.
#[derive(Debug, Default)]
pub struct UiaDesktop;

impl UiaDesktop {
    pub fn new() -> Self {
        Self
    }
}

impl Desktop for UiaDesktop {
    fn windows(&self) -> Result<Vec<WindowSnapshot>, WinaimError> {
        window::list_windows()
    }

    fn control_tree(&self, handle: isize) -> Result<TreeNode, WinaimError> {
        tree::capture_tree(handle)
    }

    fn resolve_control(
        &self,
        handle: isize,
        query: &ControlQuery,
    ) -> Result<ControlLookup, WinaimError> {
        control::resolve(handle, query)
    }

    fn click(&self, point: Point, button: MouseButton) -> Result<(), WinaimError> {
        input::click_at(point, button)
    }
}
