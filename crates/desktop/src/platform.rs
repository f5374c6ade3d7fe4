//! OS dark-mode detection.
//!
//! `theme()` runs on every redraw and the tick redraws ten times a second,
//! so the last answer is reused for `REFRESH` before asking the OS again.

use std::process::Command;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const REFRESH: Duration = Duration::from_secs(2);

static LAST_QUERY: Mutex<Option<(Instant, bool)>> = Mutex::new(None);

/// Whether the operating system prefers a dark appearance.
pub fn is_dark_mode() -> bool {
    let mut last = LAST_QUERY
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    match *last {
        Some((at, dark)) if at.elapsed() < REFRESH => dark,
        _ => {
            let dark = query_os().unwrap_or(true);
            *last = Some((Instant::now(), dark));
            dark
        }
    }
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(target_os = "macos")]
fn query_os() -> Option<bool> {
    // The key is absent in light mode, so empty output means light.
    run("defaults", &["read", "-g", "AppleInterfaceStyle"]).map(|out| macos_is_dark(&out))
}

#[cfg(target_os = "windows")]
fn query_os() -> Option<bool> {
    run(
        "reg",
        &[
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ],
    )
    .and_then(|out| windows_is_dark(&out))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn query_os() -> Option<bool> {
    run(
        "gsettings",
        &["get", "org.gnome.desktop.interface", "color-scheme"],
    )
    .and_then(|out| gnome_is_dark(&out))
}

#[cfg_attr(not(any(test, target_os = "macos")), allow(dead_code))]
fn macos_is_dark(stdout: &str) -> bool {
    stdout.trim().eq_ignore_ascii_case("dark")
}

/// `AppsUseLightTheme` is a DWORD: 0x0 dark, 0x1 light.
#[cfg_attr(not(any(test, target_os = "windows")), allow(dead_code))]
fn windows_is_dark(stdout: &str) -> Option<bool> {
    let value = stdout
        .lines()
        .find(|line| line.contains("AppsUseLightTheme"))?
        .split_whitespace()
        .last()?;
    Some(value == "0x0")
}

#[cfg_attr(
    not(any(test, not(any(target_os = "macos", target_os = "windows")))),
    allow(dead_code)
)]
fn gnome_is_dark(stdout: &str) -> Option<bool> {
    let scheme = stdout.trim().trim_matches('\'');
    match scheme {
        "" => None,
        "prefer-dark" => Some(true),
        _ => Some(false),
    }
}
