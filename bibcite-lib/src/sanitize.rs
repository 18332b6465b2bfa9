//! Turns citation keys into names that are safe to use as file stems.

use regex::Regex;
use std::sync::LazyLock;

/// Stem used when a key is absent or blank.
pub const DEFAULT_STEM: &str = "ref";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static UNSAFE_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// Returns a filesystem-safe version of `key`.
///
/// Surrounding whitespace is trimmed, each inner whitespace run becomes one
/// `_`, and every remaining character outside `[A-Za-z0-9._-]` becomes `_`.
/// Absent or blank keys map to [`DEFAULT_STEM`]. Applying the function to its
/// own output returns the same string.
pub fn safe_filename(key: Option<&str>) -> String {
    let trimmed = key.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_STEM.to_string();
    }

    let collapsed = WHITESPACE_RUN.replace_all(trimmed, "_");
    UNSAFE_CHAR.replace_all(&collapsed, "_").into_owned()
}
