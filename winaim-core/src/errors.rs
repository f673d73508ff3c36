//! Error types for `winaim_core`.
//!
//! All failures are funnelled through [`WinaimError`], which uses
//! `thiserror` for `Display` and `Error` derives.  The CLI decides which
//! variants are reported as in-band JSON records and which exit code each
//! one maps to; this crate only classifies.

use thiserror::Error;

/// Top-level error type for the `winaim_core` library.
///
/// The first group of variants corresponds to a distinct subsystem; the
/// second group carries the discovery outcomes that callers branch on.
#[derive(Debug, Error)]
pub enum WinaimError {
    /// The `--app` fragment could not be turned into a usable title pattern.
    #[error("PatternError: {0}")]
    PatternError(String),

    /// COM / Win32 error outside of tree traversal.
    #[error("ComError: {0}")]
    ComError(String),

    /// Accessibility tree traversal or element lookup failure.
    #[error("TreeError: {0}")]
    TreeError(String),

    /// Input simulation failure (SendInput mouse events).
    #[error("InputError: {0}")]
    InputError(String),

    /// Dump file or stdout write failure.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// Single-pass discovery (`--timeout 0`) found no matching window.
    #[error("no window matching '{0}' was found")]
    WindowNotFound(String),

    /// Bounded discovery gave up before any window matched.
    #[error("timed out after {seconds}s waiting for a window matching '{app}'")]
    WaitTimeout { app: String, seconds: f64 },
}

/// Convert a `windows::core::Error` (COM / Win32 HRESULT failure) into a
/// `WinaimError::ComError`.
#[cfg(target_os = "windows")]
impl From<windows::core::Error> for WinaimError {
    fn from(err: windows::core::Error) -> Self {
        WinaimError::ComError(format!("Windows COM error: {err}"))
    }
}
