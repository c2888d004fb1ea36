//! Single-device deployment over adb.
//!
//! The controller walks one implicit device through
//! `Uninitialized → ConnectionChecked → SpaceChecked →
//! {Uninstalled | SkippedUninstall} → {Installed | SkippedInstall}`.
//! What each step does is decided by a [`DevicePlan`], computed by the
//! connection and space checks and never re-queried afterwards.

use std::path::Path;

use serde::Serialize;
use sideload_parse::{
    free_space_kb, is_success, package_is_listed, package_path_present, parse_devices,
    MAIN_STORAGE_MARKER,
};
use tracing::{debug, warn};

use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::process::{CommandRunner, ProcessError, ToolOutput};

const KB_PER_GB: f64 = 1_000_000.0;

const ADB_HINT: &str = ", please install the Android platform tools and add them to the system path";

/// What the device steps will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePlan {
    /// Connection not checked yet
    Unchecked,
    /// No usable device; uninstall and install are skipped
    Absent,
    /// App not on the device; install without uninstalling
    FreshInstall,
    /// App on the device; uninstall, then install
    Reinstall,
}

impl DevicePlan {
    pub fn install_eligible(self) -> bool {
        matches!(self, DevicePlan::FreshInstall | DevicePlan::Reinstall)
    }

    pub fn uninstall_eligible(self) -> bool {
        self == DevicePlan::Reinstall
    }
}

/// Last completed device step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStage {
    Uninitialized,
    ConnectionChecked,
    SpaceChecked,
    Uninstalled,
    SkippedUninstall,
    Installed,
    SkippedInstall,
}

/// Whether uninstalling keeps the app's user data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataPolicy {
    #[default]
    Keep,
    Wipe,
}

/// Device facts observed during this run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceState {
    pub connected: bool,
    /// `None` when free space could not be determined
    pub available_space_gb: Option<f64>,
    pub app_installed: bool,
}

/// Drives the device steps of a run
pub struct DeviceController<'a, R: CommandRunner> {
    runner: &'a R,
    adb: &'a str,
    plan: DevicePlan,
    stage: DeviceStage,
    state: DeviceState,
}

impl<'a, R: CommandRunner> DeviceController<'a, R> {
    pub fn new(runner: &'a R, adb: &'a str) -> Self {
        Self {
            runner,
            adb,
            plan: DevicePlan::Unchecked,
            stage: DeviceStage::Uninitialized,
            state: DeviceState::default(),
        }
    }

    pub fn plan(&self) -> DevicePlan {
        self.plan
    }

    pub fn stage(&self) -> DeviceStage {
        self.stage
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Whether `uninstall` will act (and so needs a data policy)
    pub fn will_uninstall(&self) -> bool {
        self.plan.uninstall_eligible()
    }

    fn bridge(&self, args: &[&str]) -> Result<ToolOutput, ProcessError> {
        debug!(adb = self.adb, ?args, "bridge command");
        self.runner.run(self.adb, args)
    }

    fn bridge_error(&self, error: ProcessError) -> DeployError {
        match error {
            ProcessError::NotFound(tool) => DeployError::ToolMissing {
                tool,
                hint: ADB_HINT,
            },
            ProcessError::Io { program, source } => DeployError::io(program, source),
        }
    }

    /// List attached devices. None (or no adb at all) is advisory; more than
    /// one, or a failing `adb devices`, is fatal.
    pub fn check_connection(&mut self) -> DeployResult<()> {
        console::message("Checking connected device");

        let output = match self.bridge(&["devices"]) {
            Ok(output) if output.success => output,
            Ok(output) => return Err(self.check_failed("devices", &output)),
            Err(ProcessError::NotFound(_)) => {
                console::message(format!(
                    "{} not found, installation won't happen",
                    self.adb
                ));
                self.mark_absent();
                return Ok(());
            }
            Err(e) => return Err(self.bridge_error(e)),
        };

        let devices = parse_devices(&output.text);
        match devices.len() {
            0 => {
                console::message("There is no device connected, installation won't happen");
                self.mark_absent();
            }
            1 => {
                let device = &devices[0];
                if !device.is_ready() {
                    warn!(serial = %device.serial, state = %device.state, "device is not ready");
                    console::message(format!(
                        "Device {} is {}, later steps may fail",
                        device.serial, device.state
                    ));
                }
                self.state.connected = true;
                self.plan = DevicePlan::Reinstall;
                self.stage = DeviceStage::ConnectionChecked;
            }
            count => return Err(DeployError::MultipleDevices { count }),
        }

        Ok(())
    }

    fn check_failed(&self, command: &str, output: &ToolOutput) -> DeployError {
        debug!(code = ?output.code, output = %output.text, command, "device check failed");
        let reason = match output.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by a signal".to_string(),
        };
        DeployError::DeviceCheckFailed {
            command: format!("{} {}", self.adb, command),
            reason,
        }
    }

    fn mark_absent(&mut self) {
        self.state.connected = false;
        self.plan = DevicePlan::Absent;
        self.stage = DeviceStage::ConnectionChecked;
    }

    /// Check free storage against `required_gb`.
    ///
    /// If the app is not installed the requirement doubles and the uninstall
    /// step is dropped from the plan. A failing `df` is fatal; output without
    /// a readable free-space figure is advisory.
    pub fn check_space(&mut self, required_gb: f64, app_id: &str) -> DeployResult<()> {
        if !self.plan.install_eligible() {
            self.stage = DeviceStage::SpaceChecked;
            return Ok(());
        }

        let installed = self
            .bridge(&["shell", "cmd", "package", "path", app_id])
            .map_err(|e| self.bridge_error(e))?;
        self.state.app_installed = installed.success && package_path_present(&installed.text);

        let mut required_gb = required_gb;
        if !self.state.app_installed {
            required_gb *= 2.0;
            self.plan = DevicePlan::FreshInstall;
        }

        console::message("Checking available space on device");
        let df = self
            .bridge(&["shell", "df"])
            .map_err(|e| self.bridge_error(e))?;

        if !df.success {
            return Err(self.check_failed("shell df", &df));
        }

        match free_space_kb(&df.text, MAIN_STORAGE_MARKER) {
            Some(kb) => {
                let available_gb = kb as f64 / KB_PER_GB;
                self.state.available_space_gb = Some(available_gb);
                debug!(available_gb, required_gb, "device free space");
                if available_gb < required_gb {
                    return Err(DeployError::InsufficientSpace {
                        available_gb,
                        required_gb,
                    });
                }
            }
            None => console::message("Could not check the available space, proceeding"),
        }

        self.stage = DeviceStage::SpaceChecked;
        Ok(())
    }

    /// Remove the installed copy, keeping user data under `DataPolicy::Keep`
    pub fn uninstall(&mut self, app_id: &str, policy: DataPolicy) -> DeployResult<()> {
        if !self.plan.uninstall_eligible() {
            self.stage = DeviceStage::SkippedUninstall;
            return Ok(());
        }

        console::message("Uninstalling old version");
        let mut args = vec!["shell", "cmd", "package", "uninstall"];
        if policy == DataPolicy::Keep {
            args.push("-k");
        }
        args.push(app_id);

        let output = self.bridge(&args).map_err(|e| self.bridge_error(e))?;
        if !is_success(&output.text) {
            debug!(output = %output.text, "uninstall output lacked success marker");
            return Err(DeployError::UninstallFailed {
                app_id: app_id.to_string(),
            });
        }

        console::message("Uninstall successful");
        self.state.app_installed = false;
        self.stage = DeviceStage::Uninstalled;
        Ok(())
    }

    /// Install `package` and confirm the package manager lists `app_id`
    pub fn install(&mut self, package: &Path, app_id: &str) -> DeployResult<()> {
        if !self.plan.install_eligible() {
            self.stage = DeviceStage::SkippedInstall;
            return Ok(());
        }

        console::message("Installing new version (it can take a few minutes)");
        let package = package.to_string_lossy().into_owned();
        let failed = || DeployError::InstallFailed {
            app_id: app_id.to_string(),
        };

        let output = self
            .bridge(&["install", package.as_str()])
            .map_err(|e| self.bridge_error(e))?;
        if !output.success || !is_success(&output.text) {
            debug!(code = ?output.code, output = %output.text, "install did not report success");
            return Err(failed());
        }

        let listing = self
            .bridge(&["shell", "pm", "list", "packages", app_id])
            .map_err(|e| self.bridge_error(e))?;
        if !package_is_listed(&listing.text, app_id) {
            debug!(output = %listing.text, "package missing after install");
            return Err(failed());
        }

        console::message("Install successful");
        self.state.app_installed = true;
        self.stage = DeviceStage::Installed;
        Ok(())
    }
}
