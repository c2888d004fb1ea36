//! CI index page parser.
//!
//! The job index page lists permalinks such as
//! `Last stable build (#1234), 3 hr 12 min ago`. Only the stable permalink
//! is trusted; "last successful" and "last failed" builds are ignored.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Errors produced while scanning an index page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexParseError {
    /// No line carried the stable build marker.
    #[error("no 'Last stable build (#<n>)' marker found in index page")]
    MarkerNotFound,

    /// The marker was present but the id did not fit in a build number.
    #[error("build id '{0}' is out of range")]
    OutOfRange(String),
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"Last stable build \(#(\d+)\)").expect("stable build pattern is valid")
    })
}

/// Extract the latest stable build id from an index page body.
///
/// The body is scanned line by line. When several lines match, the last one
/// wins.
pub fn parse_last_stable_build(body: &str) -> Result<u64, IndexParseError> {
    let mut found: Option<&str> = None;

    for line in body.lines() {
        if let Some(caps) = marker().captures(line) {
            if let Some(id) = caps.get(1) {
                found = Some(id.as_str());
            }
        }
    }

    let digits = found.ok_or(IndexParseError::MarkerNotFound)?;
    digits
        .parse::<u64>()
        .map_err(|_| IndexParseError::OutOfRange(digits.to_string()))
}
