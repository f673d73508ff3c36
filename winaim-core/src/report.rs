//! In-band JSON records written to stdout.
//!
//! Every run ends with exactly one record (control mode) or one summary
//! (check mode); failures are reported the same way with `success: false`.
//! Records are compact single-line JSON with all non-ASCII characters
//! escaped as `\uXXXX`, so downstream parsers can split on newlines and
//! never worry about output encoding.  Each record is flushed immediately,
//! since the typical consumer is a pipe.

use std::io;
use std::io::Write;

use serde::Serialize;

use crate::errors::WinaimError;
use crate::geom::{Point, Rect};

// ---------------------------------------------------------------------------
// Record shapes
// ---------------------------------------------------------------------------

/// Generic failure record: argument validation, discovery failures, and
/// top-level errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub success: bool,
    pub error: String,
}

impl ErrorRecord {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Successful control resolution, with or without a click.
///
/// `control_title` and `control_type` echo the query so callers can
/// correlate records without tracking their own arguments.  `clicked` is
/// only true when the click was requested and injected; a failed injection
/// keeps `success: true` (the control was still resolved) and attaches
/// `click_error`.
#[derive(Debug, Clone, Serialize)]
pub struct ControlRecord {
    pub success: bool,
    pub control_title: String,
    pub control_type: String,
    pub position: Rect,
    pub center: Point,
    pub clicked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_error: Option<String>,
}

/// Control-level failure: the control was located but could not be used,
/// or was found in no matching window at all.
#[derive(Debug, Clone, Serialize)]
pub struct ControlErrorRecord {
    pub success: bool,
    pub error: String,
    pub control_title: String,
    pub control_type: String,
}

/// Check-mode summary, emitted after all window trees were processed.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub success: bool,
    pub action: &'static str,
    pub app_name: String,
    pub windows_found: usize,
    /// Dump file path, or `null` when trees went to the console.
    pub dump_file: Option<String>,
}

impl CheckSummary {
    pub fn new(app_name: impl Into<String>, windows_found: usize, dump_file: Option<String>) -> Self {
        Self {
            success: true,
            action: "check_windows",
            app_name: app_name.into(),
            windows_found,
            dump_file,
        }
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Serialize a record to compact ASCII-only JSON.
pub fn to_ascii_json<T: Serialize>(record: &T) -> Result<String, WinaimError> {
    let json = serde_json::to_string(record).map_err(io::Error::from)?;
    Ok(escape_non_ascii(&json))
}

/// Write one record as a single line and flush.
pub fn emit<T: Serialize>(out: &mut dyn Write, record: &T) -> Result<(), WinaimError> {
    let line = to_ascii_json(record)?;
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// Escape every non-ASCII character as `\uXXXX`, using a surrogate pair
/// for characters outside the basic multilingual plane.  serde_json emits
/// UTF-8 as-is, so titles with CJK or emoji would otherwise leak raw bytes
/// into the record stream.
fn escape_non_ascii(json: &str) -> String {
    if json.is_ascii() {
        return json.to_owned();
    }
    let mut out = String::with_capacity(json.len() + 16);
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
