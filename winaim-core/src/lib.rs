//! `winaim_core` -- core library behind the `winaim` CLI.
//!
//! Finds application windows by title pattern, resolves a named control
//! inside them, clicks it or dumps whole control trees, and reports every
//! outcome as a single-line JSON record.  All orchestration is written
//! against the [`provider::Desktop`] trait; the `win32` module supplies
//! the UI Automation implementation and only exists on Windows, so the
//! rest of the crate builds and tests anywhere.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `WinaimError` enum via `thiserror` |
//! | [`geom`] | Screen rectangles and floor-division centers |
//! | [`provider`] | The `Desktop` trait and its data types |
//! | [`discover`] | Title patterns and the bounded polling loop |
//! | [`tree`] | Control tree model and text rendering |
//! | [`dump`] | Window headers and the dump file writer |
//! | [`report`] | ASCII-only JSON records on stdout |
//! | [`runner`] | One invocation end to end, returns the exit code |
//! | `win32` | `UiaDesktop`: EnumWindows + UIA + SendInput (Windows only) |

pub mod discover;
pub mod dump;
pub mod errors;
pub mod geom;
pub mod provider;
pub mod report;
pub mod runner;
pub mod tree;

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(test)]
mod testing;
