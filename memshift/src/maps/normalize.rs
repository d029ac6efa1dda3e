//! Library path normalization
//!
//! Strips version suffixes so that sonames and their versioned symlink
//! targets compare equal: `libc.so.6` → `libc.so`,
//! `/opt/app-2.1/lib/libx.so.1.0` → `/opt/app/lib/libx.so`.
//! Interior version tokens such as `libfoo-1.2.3.so` are left alone.

use regex::Regex;
use std::sync::LazyLock;

/// Grouping key used for mappings without a backing file
pub const ANONYMOUS_KEY: &str = "[anonymous]";

/// Separator followed by dot-separated numeric groups (`.6`, `-1.2.3`, `_2`)
static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._-][0-9]+(?:\.[0-9]+)*").expect("version suffix pattern is valid"));

/// Check if the path is a special mapping (enclosed in square brackets)
#[must_use]
pub fn is_special(path: &str) -> bool {
    path.starts_with('[') && path.ends_with(']')
}

/// Remove version suffixes that end a path component
///
/// A suffix is only removed when it is followed by `/` or by the end of the
/// string. Removal repeats until nothing changes, which makes the function
/// idempotent even for chains like `a.1_2`. Special and empty paths are
/// returned unchanged.
#[must_use]
pub fn normalize_library_path(path: &str) -> String {
    if path.is_empty() || is_special(path) {
        return path.to_string();
    }

    let mut current = path.to_string();
    loop {
        let stripped = strip_once(&current);
        if stripped.len() == current.len() {
            return current;
        }
        current = stripped;
    }
}

fn strip_once(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last = 0;

    for m in VERSION_SUFFIX.find_iter(path) {
        let tail = &path[m.end()..];
        if tail.starts_with('/') || tail.trim().is_empty() {
            out.push_str(&path[last..m.start()]);
            last = m.end();
        }
    }

    out.push_str(&path[last..]);
    out
}
