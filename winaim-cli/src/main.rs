//! `winaim` -- find an application window, then click a named control or
//! dump the window's control tree.
//!
//! stdout carries JSON records (and, in console check mode, tree text);
//! all diagnostics go to stderr via `tracing`, so the record stream stays
//! machine-readable.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use winaim_core::errors::WinaimError;
use winaim_core::provider::MouseButton;
use winaim_core::report::{self, ErrorRecord};
use winaim_core::runner::{self, RunOptions};

#[derive(Parser)]
#[command(
    name = "winaim",
    about = "Find an application window, then click a named control or dump its control tree"
)]
struct Args {
    /// Window title pattern: a substring, or a regex fragment
    #[arg(long)]
    app: String,

    /// Exact title of the control to resolve
    #[arg(long)]
    control: Option<String>,

    /// Control type tag (e.g. Button, Edit, CheckBox)
    #[arg(long = "type")]
    control_type: Option<String>,

    /// Dump the control tree of every matched window instead of resolving
    #[arg(long)]
    check: bool,

    /// Click the resolved control at its center
    #[arg(long)]
    click: bool,

    /// Mouse button used with --click
    #[arg(long, default_value = "left", value_parser = ["left", "right", "middle"])]
    button: String,

    /// Write check-mode trees to this file instead of the console
    #[arg(long)]
    dump_file: Option<PathBuf>,

    /// Seconds between window polls
    #[arg(long, default_value = "1", value_parser = parse_seconds)]
    check_interval: f64,

    /// Seconds to wait after the window first appears, letting it finish
    /// building its UI
    #[arg(long, default_value = "13", value_parser = parse_seconds)]
    wait_after_found: f64,

    /// Give up after this many seconds without a match (0 = single pass;
    /// omit to wait forever)
    #[arg(long, value_parser = parse_seconds)]
    timeout: Option<f64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Parse a non-negative, finite seconds value.
fn parse_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(value).map_err(|e| e.to_string())?;
    Ok(value)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

#[cfg(target_os = "windows")]
fn dispatch(opts: &RunOptions, out: &mut dyn io::Write) -> Result<i32, WinaimError> {
    let desktop = winaim_core::win32::UiaDesktop::new();
    runner::run(&desktop, opts, out)
}

#[cfg(not(target_os = "windows"))]
fn dispatch(opts: &RunOptions, out: &mut dyn io::Write) -> Result<i32, WinaimError> {
    // The argument contract is enforced everywhere; only a valid run gets
    // as far as the missing backend.
    if let Some(code) = runner::validate(opts, out)? {
        return Ok(code);
    }
    report::emit(
        out,
        &ErrorRecord::new("no desktop backend on this platform: winaim requires Windows UI Automation"),
    )?;
    Ok(1)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let opts = RunOptions {
        app: args.app,
        control: args.control,
        control_type: args.control_type,
        check: args.check,
        click: args.click,
        button: MouseButton::from_name(&args.button),
        dump_file: args.dump_file,
        check_interval: Duration::from_secs_f64(args.check_interval),
        wait_after_found: Duration::from_secs_f64(args.wait_after_found),
        timeout: args.timeout.map(Duration::from_secs_f64),
    };
    tracing::debug!(app = %opts.app, check = opts.check, click = opts.click, "starting");

    let mut stdout = io::stdout();
    match dispatch(&opts, &mut stdout) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            let record = ErrorRecord::new(format!(
                "error while locating windows for '{}': {err}",
                opts.app
            ));
            let _ = report::emit(&mut stdout, &record);
            ExitCode::from(1)
        }
    }
}
