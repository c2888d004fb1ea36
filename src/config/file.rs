//! Operator config file (layer 2)

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

/// Parsed `sideload.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Where artifacts are stored
    pub apk: ApkSection,

    /// Signing credentials
    pub keystore: KeystoreSection,

    #[serde(default)]
    pub ci: CiSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub tools: ToolsSection,
}

/// `[apk]`
#[derive(Debug, Clone, Deserialize)]
pub struct ApkSection {
    /// Artifact destination directory
    pub path: PathBuf,
}

/// `[keystore]`
#[derive(Clone, Deserialize)]
pub struct KeystoreSection {
    /// Keystore file
    pub path: PathBuf,

    /// Keystore password
    pub password: String,

    /// Signer key alias
    #[serde(alias = "name")]
    pub alias: String,
}

impl fmt::Debug for KeystoreSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreSection")
            .field("path", &self.path)
            .field("password", &"[REDACTED]")
            .field("alias", &self.alias)
            .finish()
    }
}

/// `[ci]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CiSection {
    pub base_url: Option<String>,
    pub artifact_name: Option<String>,
    pub verify_tls: Option<bool>,
}

/// `[app]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSection {
    pub id: Option<String>,
    pub required_space_gb: Option<f64>,
}

/// `[tools]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsSection {
    pub jarsigner: Option<String>,
    pub adb: Option<String>,
}

impl ConfigFile {
    /// Load and validate the config file at `path`.
    ///
    /// A missing file is reported as `ConfigMissing` so the caller can stop
    /// before any pipeline step runs.
    pub fn load(path: &Path) -> DeployResult<Self> {
        if !path.exists() {
            return Err(DeployError::ConfigMissing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| DeployError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    /// Parse config file content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> DeployResult<Self> {
        let invalid = |reason: String| DeployError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let file: ConfigFile = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if file.apk.path.as_os_str().is_empty() {
            return Err(invalid("apk.path must not be empty".to_string()));
        }
        if file.keystore.path.as_os_str().is_empty() {
            return Err(invalid("keystore.path must not be empty".to_string()));
        }
        if file.keystore.alias.trim().is_empty() {
            return Err(invalid("keystore.alias must not be empty".to_string()));
        }
        if let Some(space) = file.app.required_space_gb {
            if !space.is_finite() || space < 0.0 {
                return Err(invalid(format!(
                    "app.required_space_gb must be a non-negative number, got {}",
                    space
                )));
            }
        }

        Ok(file)
    }
}
