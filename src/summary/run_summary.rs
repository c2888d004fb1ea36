//! Run summary (run_summary JSON)

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifact::Fetched;
use crate::device::{DataPolicy, DevicePlan, DeviceStage, DeviceState};
use crate::version::{BuildVersion, VersionRequest};

/// Schema version for the run summary
pub const RUN_SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the run summary
pub const RUN_SUMMARY_SCHEMA_ID: &str = "nightly-sideload/run_summary@1";

/// Where the device steps ended up
#[derive(Debug, Clone, Serialize)]
pub struct DeviceOutcome {
    pub plan: DevicePlan,
    pub stage: DeviceStage,
    pub state: DeviceState,

    /// Policy applied to the uninstall, if one happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_policy: Option<DataPolicy>,
}

/// Outcome of one successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the summary was created
    pub created_at: DateTime<Utc>,

    /// Build that was deployed
    pub build: BuildVersion,

    /// How the build was chosen
    pub request: VersionRequest,

    /// Current artifact path (signed form)
    pub artifact: PathBuf,

    /// Whether this run downloaded the artifact
    pub downloaded: bool,

    /// SHA-256 of the downloaded bytes, when downloaded this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    pub signed: bool,

    pub device: DeviceOutcome,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,

    /// Human-readable summary
    pub human_summary: String,
}

impl RunSummary {
    pub fn new(
        build: BuildVersion,
        request: VersionRequest,
        fetched: Fetched,
        device: DeviceOutcome,
        duration_ms: u64,
    ) -> Self {
        let signed = fetched.location.is_signed();
        let human_summary = Self::generate_human_summary(build, signed, &device);

        Self {
            schema_version: RUN_SUMMARY_SCHEMA_VERSION,
            schema_id: RUN_SUMMARY_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            build,
            request,
            artifact: fetched.location.path().to_path_buf(),
            downloaded: fetched.downloaded,
            sha256: fetched.sha256,
            signed,
            device,
            duration_ms,
            human_summary,
        }
    }

    fn generate_human_summary(build: BuildVersion, signed: bool, device: &DeviceOutcome) -> String {
        let artifact = if signed { "signed" } else { "unsigned" };
        match device.stage {
            DeviceStage::Installed => match device.plan {
                DevicePlan::FreshInstall => format!("Build {} installed on a fresh device", build),
                _ => format!("Build {} reinstalled", build),
            },
            _ => format!("Build {} {}, no device install", build, artifact),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
