//! Run-level error type.
//!
//! Every variant is fatal: it aborts the run and maps to a distinct process
//! exit code. Advisory problems never become a `DeployError`; the component
//! that detects them reports on the console and takes its degraded path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::version::BuildVersion;

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("'{}' does not exist", .0.display())]
    ConfigMissing(PathBuf),

    #[error("invalid configuration in '{}': {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("'{0}' is not a build number")]
    InvalidVersion(String),

    #[error("{context} failed: {reason}")]
    Network { context: String, reason: String },

    #[error("could not read the CI index page: {0}")]
    Parse(String),

    #[error("build {requested} is no longer available, the oldest available build is {oldest}")]
    VersionTooOld {
        requested: BuildVersion,
        oldest: BuildVersion,
    },

    #[error("build {requested} does not exist yet, the latest build is {latest}")]
    VersionNotFound {
        requested: BuildVersion,
        latest: BuildVersion,
    },

    #[error("build {0} exists but its artifact was never produced")]
    NotBuilt(BuildVersion),

    #[error("{tool} not found{hint}")]
    ToolMissing { tool: String, hint: &'static str },

    #[error("signing unsuccessful: {reason}")]
    SigningFailed { reason: String },

    #[error("there is more than one device connected ({count})")]
    MultipleDevices { count: usize },

    #[error("there is not enough space on the device ({available_gb:.2} GB available, {required_gb:.2} GB required)")]
    InsufficientSpace { available_gb: f64, required_gb: f64 },

    #[error("uninstall of {app_id} unsuccessful")]
    UninstallFailed { app_id: String },

    #[error("install of {app_id} unsuccessful")]
    InstallFailed { app_id: String },

    #[error("an error has occurred during device checking: '{command}' failed ({reason})")]
    DeviceCheckFailed { command: String, reason: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeployError {
    /// Exit code reported to the shell
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::ConfigMissing(_) => 1,
            DeployError::ConfigInvalid { .. } => 1,
            DeployError::InvalidVersion(_) => 2,
            DeployError::Network { .. } => 20,
            DeployError::Parse(_) => 21,
            DeployError::VersionTooOld { .. } => 30,
            DeployError::VersionNotFound { .. } => 31,
            DeployError::NotBuilt(_) => 32,
            DeployError::ToolMissing { .. } => 40,
            DeployError::SigningFailed { .. } => 41,
            DeployError::MultipleDevices { .. } => 50,
            DeployError::InsufficientSpace { .. } => 51,
            DeployError::UninstallFailed { .. } => 52,
            DeployError::InstallFailed { .. } => 53,
            DeployError::DeviceCheckFailed { .. } => 54,
            DeployError::Io { .. } => 60,
        }
    }

    /// Follow-up actions worth showing the operator
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            DeployError::ConfigMissing(path) => vec![format!(
                "create {} with [apk] and [keystore] sections",
                path.display()
            )],
            DeployError::VersionTooOld { oldest, .. } => {
                vec![format!("request build {} or newer", oldest)]
            }
            DeployError::VersionNotFound { latest, .. } => {
                vec![format!("request build {} or older", latest)]
            }
            DeployError::NotBuilt(_) => vec!["try a different version".to_string()],
            DeployError::SigningFailed { .. } => {
                vec!["check the keystore details in the config file".to_string()]
            }
            DeployError::MultipleDevices { .. } => {
                vec!["disconnect all devices except the target".to_string()]
            }
            DeployError::InsufficientSpace { .. } => {
                vec!["free up storage on the device".to_string()]
            }
            DeployError::DeviceCheckFailed { .. } => {
                vec!["check that the device is unlocked and authorized for USB debugging".to_string()]
            }
            DeployError::InstallFailed { .. } => vec![
                "try a different version".to_string(),
                "try a full uninstall and reinstall of the current one".to_string(),
            ],
            _ => Vec::new(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type DeployResult<T> = Result<T, DeployError>;
