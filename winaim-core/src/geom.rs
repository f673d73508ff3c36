//! Screen-coordinate primitives shared by the tree, provider, and report
//! layers.

use std::fmt;

use serde::Serialize;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Bounding rectangle in screen coordinates.
///
/// On multi-monitor desktops any edge can be negative, so the center is
/// computed with floor division to keep it stable on both sides of the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Center of the rectangle, floor-divided.
    pub fn center(&self) -> Point {
        Point {
            x: mid(self.left, self.right),
            y: mid(self.top, self.bottom),
        }
    }
}

/// Floor midpoint of two edges.  Widened to `i64` so opposite screen
/// corners cannot overflow the sum.
fn mid(low: i32, high: i32) -> i32 {
    (low as i64 + high as i64).div_euclid(2) as i32
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(L{}, T{}, R{}, B{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
