//! Pipeline orchestration
//!
//! Runs one deployment in a fixed order:
//! - Resolve the build
//! - Check the device (connection, then space)
//! - Download the unsigned package
//! - Sign it
//! - Uninstall the old copy
//! - Install the new one
//!
//! The first fatal error ends the run. Advisory problems (no device, unknown
//! free space) only narrow what the later steps do.

use std::time::Instant;

use tracing::info;

use crate::artifact::{ArtifactFetcher, Fetched, PackageSigner};
use crate::config::RunConfig;
use crate::console;
use crate::device::{DataPolicy, DeviceController};
use crate::error::DeployResult;
use crate::http::HttpClient;
use crate::operator::{ask_data_policy, Operator};
use crate::process::CommandRunner;
use crate::summary::{DeviceOutcome, RunSummary};
use crate::version::{BuildVersion, VersionRequest, VersionResolver};

/// One deployment over the given collaborators
pub struct Pipeline<'a, H: HttpClient, R: CommandRunner> {
    config: &'a RunConfig,
    http: &'a H,
    runner: &'a R,
}

impl<'a, H: HttpClient, R: CommandRunner> Pipeline<'a, H, R> {
    pub fn new(config: &'a RunConfig, http: &'a H, runner: &'a R) -> Self {
        Self {
            config,
            http,
            runner,
        }
    }

    /// Execute every step.
    ///
    /// `data_policy` answers the keep-data question up front; when `None`
    /// the operator is asked, and only if an uninstall is going to happen.
    pub fn run(
        &self,
        operator: &mut dyn Operator,
        data_policy: Option<DataPolicy>,
    ) -> DeployResult<RunSummary> {
        let started = Instant::now();
        let config = self.config;

        let build = self.resolve()?;

        let mut device = DeviceController::new(self.runner, &config.tools.adb);
        device.check_connection()?;
        device.check_space(config.required_space_gb, &config.app_id)?;
        info!(plan = ?device.plan(), state = ?device.state(), "device checked");

        let fetcher = ArtifactFetcher::new(self.http, &config.ci_base_url, &config.artifact_name);
        let location = fetcher.locate(build, &config.artifact_dir);
        let fetched = fetcher.ensure_downloaded(location, build, &config.requested)?;

        let signer = PackageSigner::new(self.runner, &config.tools.jarsigner);
        let signed = signer.sign(fetched.location.clone(), &config.keystore)?;
        let fetched = Fetched {
            location: signed,
            ..fetched
        };

        let applied_policy = if device.will_uninstall() {
            Some(match data_policy {
                Some(policy) => policy,
                None => ask_data_policy(operator)?,
            })
        } else {
            None
        };
        device.uninstall(&config.app_id, applied_policy.unwrap_or_default())?;
        device.install(fetched.location.path(), &config.app_id)?;

        let outcome = DeviceOutcome {
            plan: device.plan(),
            stage: device.stage(),
            state: device.state().clone(),
            data_policy: applied_policy,
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(%build, duration_ms, stage = ?outcome.stage, "run complete");

        Ok(RunSummary::new(
            build,
            config.requested,
            fetched,
            outcome,
            duration_ms,
        ))
    }

    fn resolve(&self) -> DeployResult<BuildVersion> {
        let resolver = VersionResolver::new(self.http, &self.config.ci_base_url);
        let build = resolver.resolve(&self.config.requested)?;

        match self.config.requested {
            VersionRequest::Latest => console::message(format!("Latest version: {}", build)),
            VersionRequest::Pinned(_) => {
                console::message(format!("Requested version: {}", build))
            }
        }
        Ok(build)
    }
}
