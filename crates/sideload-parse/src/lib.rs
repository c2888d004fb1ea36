//! Fail-closed parsers for the text produced by the tools a sideload run
//! talks to.
//!
//! Every external collaborator (the CI index page, `jarsigner`, `adb`) gets
//! its own module. Each parser turns a semi-structured blob into a typed
//! result and treats any shape it does not recognise as failure, so the
//! orchestration code never matches on raw strings.

pub mod adb;
pub mod ci_index;
pub mod jarsigner;

pub use adb::{
    free_space_kb, is_success, package_is_listed, package_path_present, parse_devices,
    DeviceEntry, MAIN_STORAGE_MARKER,
};
pub use ci_index::{parse_last_stable_build, IndexParseError};
pub use jarsigner::{classify_sign_output, SignOutcome};
