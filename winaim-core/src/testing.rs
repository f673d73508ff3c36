//! In-memory [`Desktop`] fake shared by the discovery and runner tests.
//!
//! Outcomes are scripted per window handle; calls are recorded through
//! `RefCell` so tests can assert which windows were inspected and what
//! was clicked.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::WinaimError;
use crate::geom::{Point, Rect};
use crate::provider::{ControlLookup, ControlQuery, Desktop, MouseButton, WindowSnapshot};
use crate::tree::TreeNode;

/// Scripted outcome of `resolve_control` for one window handle.
pub(crate) enum Lookup {
    /// The window could not be inspected at all (`Err` from the provider).
    Broken(&'static str),
    NotFound,
    Found(Rect),
    Stale(&'static str),
}

#[derive(Default)]
pub(crate) struct FakeDesktop {
    enumerations: RefCell<Vec<Vec<WindowSnapshot>>>,
    trees: HashMap<isize, TreeNode>,
    broken_trees: Vec<isize>,
    lookups: HashMap<isize, Lookup>,
    click_error: Option<&'static str>,
    pub(crate) enumeration_calls: RefCell<usize>,
    pub(crate) inspected: RefCell<Vec<isize>>,
    pub(crate) clicks: RefCell<Vec<(Point, MouseButton)>>,
}

impl FakeDesktop {
    /// Every enumeration call returns the same window list.
    pub(crate) fn with_windows(windows: Vec<WindowSnapshot>) -> Self {
        Self::with_enumerations(vec![windows])
    }

    /// Successive enumeration calls pop the front; the last entry repeats.
    pub(crate) fn with_enumerations(enumerations: Vec<Vec<WindowSnapshot>>) -> Self {
        let fake = Self::default();
        *fake.enumerations.borrow_mut() = enumerations;
        fake
    }

    pub(crate) fn lookup(mut self, handle: isize, lookup: Lookup) -> Self {
        self.lookups.insert(handle, lookup);
        self
    }

    pub(crate) fn tree(mut self, handle: isize, tree: TreeNode) -> Self {
        self.trees.insert(handle, tree);
        self
    }

    pub(crate) fn broken_tree(mut self, handle: isize) -> Self {
        self.broken_trees.push(handle);
        self
    }

    pub(crate) fn failing_clicks(mut self, message: &'static str) -> Self {
        self.click_error = Some(message);
        self
    }
}

impl Desktop for FakeDesktop {
    fn windows(&self) -> Result<Vec<WindowSnapshot>, WinaimError> {
        *self.enumeration_calls.borrow_mut() += 1;
        let mut seq = self.enumerations.borrow_mut();
        match seq.len() {
            0 => Ok(Vec::new()),
            1 => Ok(seq[0].clone()),
            _ => Ok(seq.remove(0)),
        }
    }

    fn control_tree(&self, handle: isize) -> Result<TreeNode, WinaimError> {
        if self.broken_trees.contains(&handle) {
            return Err(WinaimError::TreeError(format!("window {handle} is gone")));
        }
        self.trees
            .get(&handle)
            .cloned()
            .ok_or_else(|| WinaimError::TreeError(format!("no tree scripted for window {handle}")))
    }

    fn resolve_control(
        &self,
        handle: isize,
        _query: &ControlQuery,
    ) -> Result<ControlLookup, WinaimError> {
        self.inspected.borrow_mut().push(handle);
        match self.lookups.get(&handle) {
            Some(Lookup::Broken(message)) => Err(WinaimError::TreeError((*message).to_owned())),
            Some(Lookup::NotFound) | None => Ok(ControlLookup::NotFound),
            Some(Lookup::Found(rect)) => Ok(ControlLookup::Found(*rect)),
            Some(Lookup::Stale(message)) => Ok(ControlLookup::Stale((*message).to_owned())),
        }
    }

    fn click(&self, point: Point, button: MouseButton) -> Result<(), WinaimError> {
        self.clicks.borrow_mut().push((point, button));
        match self.click_error {
            Some(message) => Err(WinaimError::InputError(message.to_owned())),
            None => Ok(()),
        }
    }
}

/// Shorthand window snapshot.
pub(crate) fn window(handle: isize, title: &str) -> WindowSnapshot {
    WindowSnapshot {
        handle,
        title: title.to_owned(),
    }
}

/// Shorthand childless tree node.
pub(crate) fn leaf(name: &str, control_type: &str, rect: Rect, depth: usize) -> TreeNode {
    TreeNode {
        name: name.to_owned(),
        control_type: control_type.to_owned(),
        class_name: String::new(),
        automation_id: String::new(),
        rect,
        depth,
        children: Vec::new(),
    }
}
