//! Nightly sideload
//!
//! Fetches a nightly Android package from a CI artifact server, signs it
//! with a local keystore and reinstalls it on the single connected device.

pub mod artifact;
pub mod config;
pub mod console;
pub mod device;
pub mod error;
pub mod http;
pub mod mock;
pub mod operator;
pub mod pipeline;
pub mod process;
pub mod summary;
pub mod telemetry;
pub mod version;

pub use config::{ConfigFile, RunConfig};
pub use device::{DataPolicy, DeviceController, DevicePlan, DeviceStage};
pub use error::{DeployError, DeployResult};
pub use http::{HttpClient, ReqwestClient};
pub use pipeline::Pipeline;
pub use process::{CommandRunner, SystemRunner};
pub use summary::RunSummary;
pub use version::{BuildVersion, VersionRequest};
