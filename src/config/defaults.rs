//! Built-in defaults (layer 1)
//!
//! Hardcoded values for everything the config file may leave out.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// CI job URL, ending in `/` (default: Krita nightly Android job)
    pub ci_base_url: String,

    /// Artifact file name published by each build
    pub artifact_name: String,

    /// Validate TLS certificates of the CI server (default: true)
    pub verify_tls: bool,

    /// Android package identifier (default: "org.krita")
    pub app_id: String,

    /// Free space needed on the device for a reinstall, in GB (default: 1.5)
    pub required_space_gb: f64,

    /// Signing tool program (default: "jarsigner")
    pub jarsigner: String,

    /// Device bridge program (default: "adb")
    pub adb: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            ci_base_url: "https://binary-factory.kde.org/job/Krita_Nightly_Android_Build/"
                .to_string(),
            artifact_name: "krita_build_apk-release-unsigned.apk".to_string(),
            verify_tls: true,
            app_id: "org.krita".to_string(),
            required_space_gb: 1.5,
            jarsigner: "jarsigner".to_string(),
            adb: "adb".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert!(defaults.ci_base_url.ends_with('/'));
        assert_eq!(defaults.app_id, "org.krita");
        assert_eq!(defaults.required_space_gb, 1.5);
        assert!(defaults.artifact_name.ends_with("-unsigned.apk"));
        assert!(defaults.verify_tls);
    }
}
