//! Run summary
//!
//! What a successful run did, printed as JSON with `--json`.

mod run_summary;

pub use run_summary::{DeviceOutcome, RunSummary, RUN_SUMMARY_SCHEMA_ID, RUN_SUMMARY_SCHEMA_VERSION};
