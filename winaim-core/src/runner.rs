//! Orchestration: discovery, then check mode or control mode.
//!
//! [`run`] is the single entry point behind the CLI.  It owns the record
//! discipline: stdout (the `out` writer) carries JSON records plus, in
//! console check mode, the tree text itself; everything diagnostic goes
//! through `tracing`.  The returned value is the process exit code.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::discover;
use crate::dump::{window_header, DumpFile};
use crate::errors::WinaimError;
use crate::provider::{ControlLookup, ControlQuery, Desktop, MouseButton, WindowSnapshot};
use crate::report::{self, CheckSummary, ControlErrorRecord, ControlRecord, ErrorRecord};
use crate::tree::render_tree;

/// Message for the argument-contract violation (neither `--check` nor a
/// complete control query).
const USAGE_ERROR: &str = "--check or both --control and --type must be specified";

/// Everything one invocation needs, already parsed and validated for
/// shape by the CLI layer.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub app: String,
    pub control: Option<String>,
    pub control_type: Option<String>,
    pub check: bool,
    pub click: bool,
    pub button: MouseButton,
    pub dump_file: Option<PathBuf>,
    pub check_interval: Duration,
    pub wait_after_found: Duration,
    pub timeout: Option<Duration>,
}

enum Mode {
    Check,
    Control(ControlQuery),
}

impl Mode {
    /// `None` when the argument contract is violated.
    fn from_options(opts: &RunOptions) -> Option<Mode> {
        if opts.check {
            return Some(Mode::Check);
        }
        match (opts.control.as_deref(), opts.control_type.as_deref()) {
            (Some(title), Some(control_type)) => Some(Mode::Control(ControlQuery {
                title: title.to_owned(),
                control_type: control_type.to_owned(),
            })),
            _ => None,
        }
    }
}

/// Check the argument contract without touching the desktop.
///
/// On violation the usage record is emitted and `Some(exit_code)` comes
/// back; the caller stops there.  Split out of [`run`] so builds without
/// a desktop backend still enforce the same contract.
pub fn validate(opts: &RunOptions, out: &mut dyn Write) -> Result<Option<i32>, WinaimError> {
    if Mode::from_options(opts).is_none() {
        report::emit(out, &ErrorRecord::new(USAGE_ERROR))?;
        return Ok(Some(0));
    }
    Ok(None)
}

/// Execute one invocation against `desktop`, writing records to `out`.
///
/// Returns the process exit code.  `Err` is reserved for unexpected
/// failures the caller turns into a generic error record; every expected
/// outcome (usage error, no window, timeout, control missing, click
/// failure) is already reported in-band here.
pub fn run(
    desktop: &dyn Desktop,
    opts: &RunOptions,
    out: &mut dyn Write,
) -> Result<i32, WinaimError> {
    let Some(mode) = Mode::from_options(opts) else {
        report::emit(out, &ErrorRecord::new(USAGE_ERROR))?;
        return Ok(0);
    };

    let windows = match discover::wait_for_windows(
        desktop,
        &opts.app,
        opts.check_interval,
        opts.wait_after_found,
        opts.timeout,
    ) {
        Ok(windows) => windows,
        Err(err @ WinaimError::WindowNotFound(_)) => {
            // Single-pass probe that found nothing: an answer, not a failure.
            report::emit(out, &ErrorRecord::new(err.to_string()))?;
            return Ok(0);
        }
        Err(err @ WinaimError::WaitTimeout { .. }) => {
            report::emit(out, &ErrorRecord::new(err.to_string()))?;
            return Ok(1);
        }
        Err(other) => return Err(other),
    };

    match mode {
        Mode::Check => run_check(desktop, opts, &windows, out),
        Mode::Control(query) => run_control(desktop, opts, &query, &windows, out),
    }
}

/// Dump the tree of every matched window, then emit the summary.
///
/// A window whose tree cannot be captured (closed mid-run, access denied)
/// is skipped; its index is still consumed so the remaining headers keep
/// their enumeration positions.
fn run_check(
    desktop: &dyn Desktop,
    opts: &RunOptions,
    windows: &[WindowSnapshot],
    out: &mut dyn Write,
) -> Result<i32, WinaimError> {
    let mut dump = opts.dump_file.as_ref().map(DumpFile::new);

    for (position, window) in windows.iter().enumerate() {
        let index = position + 1;
        let tree = match desktop.control_tree(window.handle) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::debug!(handle = window.handle, error = %err, "skipping window, tree capture failed");
                continue;
            }
        };
        let text = render_tree(&tree);
        match dump.as_mut() {
            Some(file) => {
                file.write_window(index, &window.title, window.handle, &text)?;
                tracing::info!(index, path = %file.path().display(), "window tree saved");
            }
            None => {
                writeln!(out, "{}", window_header(index, &window.title, window.handle))?;
                writeln!(out, "{text}")?;
            }
        }
    }

    let dump_file = opts.dump_file.as_ref().map(|p| p.display().to_string());
    report::emit(out, &CheckSummary::new(&opts.app, windows.len(), dump_file))?;
    Ok(0)
}

/// Resolve the control window by window and stop at the first record.
///
/// Windows that cannot be inspected are skipped.  A window holding the
/// control produces the one and only record (click attempted here when
/// requested); a stale match produces a control error record.  Only when
/// every window came up empty does the terminal not-found record go out.
fn run_control(
    desktop: &dyn Desktop,
    opts: &RunOptions,
    query: &ControlQuery,
    windows: &[WindowSnapshot],
    out: &mut dyn Write,
) -> Result<i32, WinaimError> {
    for window in windows {
        let lookup = match desktop.resolve_control(window.handle, query) {
            Ok(lookup) => lookup,
            Err(err) => {
                tracing::debug!(handle = window.handle, error = %err, "skipping window, control lookup failed");
                continue;
            }
        };
        match lookup {
            ControlLookup::NotFound => continue,
            ControlLookup::Found(position) => {
                let center = position.center();
                tracing::info!(
                    handle = window.handle,
                    x = center.x,
                    y = center.y,
                    "control resolved"
                );
                let mut record = ControlRecord {
                    success: true,
                    control_title: query.title.clone(),
                    control_type: query.control_type.clone(),
                    position,
                    center,
                    clicked: false,
                    click_error: None,
                };
                if opts.click {
                    match desktop.click(center, opts.button) {
                        Ok(()) => record.clicked = true,
                        Err(err) => {
                            tracing::warn!(error = %err, "click failed");
                            record.click_error = Some(err.to_string());
                        }
                    }
                }
                report::emit(out, &record)?;
                return Ok(0);
            }
            ControlLookup::Stale(message) => {
                report::emit(
                    out,
                    &ControlErrorRecord {
                        success: false,
                        error: message,
                        control_title: query.title.clone(),
                        control_type: query.control_type.clone(),
                    },
                )?;
                return Ok(0);
            }
        }
    }

    report::emit(
        out,
        &ErrorRecord::new(format!(
            "control '{}' of type '{}' not found in any window matching '{}'",
            query.title, query.control_type, opts.app
        )),
    )?;
    Ok(0)
}
