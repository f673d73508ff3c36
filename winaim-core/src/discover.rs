//! Window discovery: title matching and the bounded polling loop.

use std::thread;
use std::time::{Duration, Instant};

use regex::{Regex, RegexBuilder};

use crate::errors::WinaimError;
use crate::provider::{Desktop, WindowSnapshot};

/// Build the case-insensitive title pattern for an `--app` fragment.
///
/// The fragment is wrapped as `.*<fragment>.*`, so plain text behaves as a
/// substring match while regex metacharacters keep their meaning.  A
/// fragment that fails to compile (say, an unbalanced bracket pasted from
/// a window title) is retried as an escaped literal rather than rejected.
pub fn title_pattern(app: &str) -> Result<Regex, WinaimError> {
    match build_pattern(app) {
        Ok(re) => Ok(re),
        Err(first) => {
            tracing::debug!(%app, error = %first, "pattern is not valid regex, matching literally");
            build_pattern(&regex::escape(app)).map_err(|e| {
                WinaimError::PatternError(format!("cannot build title pattern for '{app}': {e}"))
            })
        }
    }
}

fn build_pattern(fragment: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(".*{fragment}.*"))
        .case_insensitive(true)
        .build()
}

/// Poll window enumeration until at least one title matches `app`.
///
/// `interval` separates polls.  `timeout` bounds the wait: `None` polls
/// forever, zero means exactly one pass, and any other value turns into
/// [`WinaimError::WaitTimeout`] once it elapses without a match.  The
/// deadline is only checked after an enumeration, so at least one pass
/// always happens.  On success the full match list is returned after one
/// `post_found_delay` sleep, giving the application time to finish
/// building its UI before anything touches it.
pub fn wait_for_windows(
    desktop: &dyn Desktop,
    app: &str,
    interval: Duration,
    post_found_delay: Duration,
    timeout: Option<Duration>,
) -> Result<Vec<WindowSnapshot>, WinaimError> {
    let pattern = title_pattern(app)?;
    let started = Instant::now();
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;
        let matched: Vec<WindowSnapshot> = desktop
            .windows()?
            .into_iter()
            .filter(|w| pattern.is_match(&w.title))
            .collect();

        if !matched.is_empty() {
            tracing::info!(
                app,
                windows = matched.len(),
                attempt,
                "matching windows found"
            );
            if !post_found_delay.is_zero() {
                tracing::debug!(delay_secs = post_found_delay.as_secs_f64(), "settling");
                thread::sleep(post_found_delay);
            }
            return Ok(matched);
        }

        if let Some(limit) = timeout {
            if limit.is_zero() {
                return Err(WinaimError::WindowNotFound(app.to_owned()));
            }
            if started.elapsed() >= limit {
                return Err(WinaimError::WaitTimeout {
                    app: app.to_owned(),
                    seconds: limit.as_secs_f64(),
                });
            }
        }

        tracing::debug!(app, attempt, "no matching window yet");
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{window, FakeDesktop};

    const TICK: Duration = Duration::ZERO;

    #[test]
    fn plain_fragment_matches_as_substring() {
        let re = title_pattern("Notepad").unwrap();
        assert!(re.is_match("Untitled - Notepad"));
        assert!(re.is_match("Notepad"));
        assert!(!re.is_match("WordPad"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let re = title_pattern("notepad").unwrap();
        assert!(re.is_match("Untitled - NOTEPAD"));
        assert!(re.is_match("untitled - Notepad"));
    }

    #[test]
    fn regex_fragments_keep_their_meaning() {
        let re = title_pattern("Note.*pad").unwrap();
        assert!(re.is_match("Note - WordPad"));
        assert!(!re.is_match("Notepd"));
    }

    #[test]
    fn invalid_regex_falls_back_to_literal_match() {
        let re = title_pattern("C++ [x86").unwrap();
        assert!(re.is_match("Visual C++ [x86] Tools"));
        assert!(!re.is_match("Visual C++ Tools"));
    }

    #[test]
    fn first_pass_match_returns_after_one_enumeration() {
        let desktop = FakeDesktop::with_windows(vec![
            window(1, "Untitled - Notepad"),
            window(2, "Calculator"),
        ]);
        let found = wait_for_windows(&desktop, "Notepad", TICK, TICK, None).unwrap();
        assert_eq!(found, vec![window(1, "Untitled - Notepad")]);
        assert_eq!(*desktop.enumeration_calls.borrow(), 1);
    }

    #[test]
    fn polls_until_the_window_appears() {
        let desktop = FakeDesktop::with_enumerations(vec![
            vec![],
            vec![window(9, "Calculator")],
            vec![window(9, "Calculator"), window(7, "Untitled - Notepad")],
        ]);
        let found = wait_for_windows(&desktop, "Notepad", TICK, TICK, None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, 7);
        assert_eq!(*desktop.enumeration_calls.borrow(), 3);
    }

    #[test]
    fn zero_timeout_does_exactly_one_pass() {
        let desktop = FakeDesktop::with_windows(vec![window(9, "Calculator")]);
        let err =
            wait_for_windows(&desktop, "Notepad", TICK, TICK, Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, WinaimError::WindowNotFound(app) if app == "Notepad"));
        assert_eq!(*desktop.enumeration_calls.borrow(), 1);
    }

    #[test]
    fn elapsed_timeout_reports_wait_timeout() {
        let desktop = FakeDesktop::with_windows(vec![]);
        let err = wait_for_windows(
            &desktop,
            "Notepad",
            Duration::from_millis(1),
            TICK,
            Some(Duration::from_millis(5)),
        )
        .unwrap_err();
        match err {
            WinaimError::WaitTimeout { app, seconds } => {
                assert_eq!(app, "Notepad");
                assert!((seconds - 0.005).abs() < 1e-9);
            }
            other => panic!("expected WaitTimeout, got {other:?}"),
        }
        assert!(*desktop.enumeration_calls.borrow() >= 1);
    }

    #[test]
    fn timeout_still_enumerates_at_least_once() {
        // Even a timeout that is already elapsed gets one look at the desktop.
        let desktop = FakeDesktop::with_windows(vec![window(3, "Untitled - Notepad")]);
        let found = wait_for_windows(
            &desktop,
            "Notepad",
            TICK,
            TICK,
            Some(Duration::from_nanos(1)),
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(*desktop.enumeration_calls.borrow(), 1);
    }

    #[test]
    fn all_matching_windows_are_returned_in_enumeration_order() {
        let desktop = FakeDesktop::with_windows(vec![
            window(1, "Notepad - a.txt"),
            window(2, "Calculator"),
            window(3, "Notepad - b.txt"),
        ]);
        let found = wait_for_windows(&desktop, "Notepad", TICK, TICK, None).unwrap();
        let handles: Vec<isize> = found.iter().map(|w| w.handle).collect();
        assert_eq!(handles, vec![1, 3]);
    }
}
