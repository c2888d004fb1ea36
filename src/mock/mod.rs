//! In-process test doubles
//!
//! Stand-ins for every external collaborator of a run, so the whole pipeline
//! can be exercised without a network, a JDK or a device:
//!
//! - `MockHttp`: canned responses per URL, with request counting
//! - `ScriptedRunner`: canned process output per command-line prefix
//! - `ScriptedOperator`: queued answers to operator prompts

mod http;
mod operator;
mod runner;

pub use http::MockHttp;
pub use operator::ScriptedOperator;
pub use runner::ScriptedRunner;
