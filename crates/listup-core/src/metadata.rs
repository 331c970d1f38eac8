//! Header comment metadata (`! Title:`, `! License:`, `! Homepage:`, `! Expires:`).
//!
//! Markers are single comment lines of the form `! <key>: <value>` (`-` or
//! whitespace also separate key and value), matched case-insensitively
//! anywhere in the document.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

fn marker_pattern(key: &str) -> Regex {
    let pattern = format!(r"(?mi)^\s*!\s*{key}[\s\-:]+(\S[\S ]*)\r?$");
    Regex::new(&pattern).expect("marker pattern is valid")
}

static TITLE: Lazy<Regex> = Lazy::new(|| marker_pattern("title"));
static LICENSE: Lazy<Regex> = Lazy::new(|| marker_pattern("licen[sc]e"));
static HOMEPAGE: Lazy<Regex> = Lazy::new(|| marker_pattern("homepage"));
static EXPIRES: Lazy<Regex> = Lazy::new(|| marker_pattern("expires"));
static EXPIRES_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(h|hours?|d|days?)\b").expect("expires value pattern is valid")
});

fn first_value(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Value of the first `! Title:` line.
pub fn extract_title(text: &str) -> Option<String> {
    first_value(&TITLE, text)
}

/// True if any `! License:` / `! Licence:` line is present. The value is not inspected.
pub fn has_license(text: &str) -> bool {
    LICENSE.is_match(text)
}

pub fn extract_homepage(text: &str) -> Option<String> {
    first_value(&HOMEPAGE, text)
}

/// Update interval from `! Expires: 4 days` / `! Expires: 12 hours`.
/// Trailing text such as `(update frequency)` is ignored; unknown units yield None.
pub fn extract_expires(text: &str) -> Option<Duration> {
    let value = first_value(&EXPIRES, text)?;
    let caps = EXPIRES_VALUE.captures(&value)?;
    let n: u64 = caps[1].parse().ok()?;
    let unit_secs = if caps[2].to_ascii_lowercase().starts_with('h') {
        3600
    } else {
        86_400
    };
    Some(Duration::from_secs(n.checked_mul(unit_secs)?))
}

/// All header metadata the updater records for a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterListMetadata {
    pub title: Option<String>,
    pub homepage: Option<String>,
    pub expires: Option<Duration>,
    pub has_license: bool,
}

impl FilterListMetadata {
    pub fn extract(text: &str) -> Self {
        Self {
            title: extract_title(text),
            homepage: extract_homepage(text),
            expires: extract_expires(text),
            has_license: has_license(text),
        }
    }
}
