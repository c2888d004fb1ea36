//! Operator-facing progress lines.
//!
//! Every line is prefixed with the local time, e.g.
//! `[2024-05-01 09:30:12]: Latest version: 1234`. Diagnostic detail goes to
//! `tracing` instead.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn line<Tz: TimeZone>(at: &DateTime<Tz>, text: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}]: {}", at.format(TIMESTAMP_FORMAT), text)
}

/// Progress message on stdout
pub fn message(text: impl Display) {
    println!("{}", line(&Local::now(), &text.to_string()));
}

/// Error message on stderr
pub fn error(text: impl Display) {
    eprintln!("{}", line(&Local::now(), &format!("Error - {}", text)));
}
