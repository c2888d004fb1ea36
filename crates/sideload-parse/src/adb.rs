//! Android Debug Bridge output parsers.

/// Substring identifying the main user storage partition in `df` output.
pub const MAIN_STORAGE_MARKER: &str = "/storage/emulated";

/// Column of the `df` table holding available kilobytes.
const DF_AVAILABLE_COLUMN: usize = 3;

/// Marker printed by `cmd package uninstall` and `adb install` on success.
const SUCCESS_MARKER: &str = "Success";

/// One row of `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    /// Device serial number
    pub serial: String,
    /// Connection state (`device`, `unauthorized`, `offline`, ...)
    pub state: String,
}

impl DeviceEntry {
    /// Whether the bridge can talk to this device
    pub fn is_ready(&self) -> bool {
        self.state == "device"
    }
}

/// Parse the output of `adb devices`.
///
/// Only `<serial>\t<state>` rows count as devices. The header, daemon
/// start-up lines and any other chatter (e.g. a server version mismatch
/// notice) are ignored.
pub fn parse_devices(output: &str) -> Vec<DeviceEntry> {
    output.lines().filter_map(device_row).collect()
}

fn device_row(line: &str) -> Option<DeviceEntry> {
    let (serial, state) = line.trim().split_once('\t')?;
    let (serial, state) = (serial.trim(), state.trim());
    let single_token = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
    if !single_token(serial) || !single_token(state) {
        return None;
    }

    Some(DeviceEntry {
        serial: serial.to_string(),
        state: state.to_string(),
    })
}

/// Available kilobytes on the partition whose `df` line contains `marker`.
///
/// Returns `None` when no line matches or the column is not an integer.
pub fn free_space_kb(df_output: &str, marker: &str) -> Option<u64> {
    let line = df_output.lines().find(|line| line.contains(marker))?;
    line.split_whitespace()
        .nth(DF_AVAILABLE_COLUMN)?
        .parse::<u64>()
        .ok()
}

/// Whether a package-manager command reported success.
pub fn is_success(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}

/// Whether `cmd package path <id>` printed an install location.
pub fn package_path_present(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.trim_start().starts_with("package:"))
}

/// Whether `pm list packages <id>` lists exactly `app_id`.
///
/// `pm list packages` filters by substring, so `org.krita` would also match
/// `org.krita.beta`; only the exact entry counts.
pub fn package_is_listed(output: &str, app_id: &str) -> bool {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .any(|id| id == app_id)
}
