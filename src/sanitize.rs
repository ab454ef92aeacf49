//! Display name to path-safe slug conversion

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("static regex"))
}

/// Turn a design element name into a lowercase slug usable as a path component.
///
/// `< > : " / \ | ? *` and any other character outside `[A-Za-z0-9._-]` become `_`;
/// whitespace runs collapse to a single `_`. Uniqueness is not guaranteed.
pub fn sanitize(name: &str) -> String {
    let collapsed = whitespace_runs().replace_all(name, "_");
    unsafe_chars()
        .replace_all(&collapsed, "_")
        .to_ascii_lowercase()
}
