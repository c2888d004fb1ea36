//! Immutable per-run configuration

use std::fmt;
use std::path::PathBuf;

use super::defaults::BuiltinDefaults;
use super::file::ConfigFile;
use crate::version::VersionRequest;

/// Keystore credentials passed to the signing tool
#[derive(Clone)]
pub struct KeystoreConfig {
    pub path: PathBuf,
    pub password: String,
    pub alias: String,
}

impl fmt::Debug for KeystoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreConfig")
            .field("path", &self.path)
            .field("password", &"[REDACTED]")
            .field("alias", &self.alias)
            .finish()
    }
}

/// External programs used by the run
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub jarsigner: String,
    pub adb: String,
}

/// Everything a run needs, fixed before the first pipeline step
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CI job URL, always ending in `/`
    pub ci_base_url: String,

    /// Artifact file name on the CI server
    pub artifact_name: String,

    /// Validate CI TLS certificates
    pub verify_tls: bool,

    /// Android package identifier
    pub app_id: String,

    /// Free space needed for a reinstall, in GB
    pub required_space_gb: f64,

    /// Local artifact directory
    pub artifact_dir: PathBuf,

    pub keystore: KeystoreConfig,

    pub tools: ToolPaths,

    /// Build to deploy
    pub requested: VersionRequest,
}

impl RunConfig {
    /// Overlay the config file on the built-in defaults
    pub fn new(defaults: BuiltinDefaults, file: ConfigFile, requested: VersionRequest) -> Self {
        let mut ci_base_url = file.ci.base_url.unwrap_or(defaults.ci_base_url);
        if !ci_base_url.ends_with('/') {
            ci_base_url.push('/');
        }

        Self {
            ci_base_url,
            artifact_name: file.ci.artifact_name.unwrap_or(defaults.artifact_name),
            verify_tls: file.ci.verify_tls.unwrap_or(defaults.verify_tls),
            app_id: file.app.id.unwrap_or(defaults.app_id),
            required_space_gb: file
                .app
                .required_space_gb
                .unwrap_or(defaults.required_space_gb),
            artifact_dir: file.apk.path,
            keystore: KeystoreConfig {
                path: file.keystore.path,
                password: file.keystore.password,
                alias: file.keystore.alias,
            },
            tools: ToolPaths {
                jarsigner: file.tools.jarsigner.unwrap_or(defaults.jarsigner),
                adb: file.tools.adb.unwrap_or(defaults.adb),
            },
            requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::BuildVersion;
    use std::path::Path;

    fn file(extra: &str) -> ConfigFile {
        let content = format!(
            r#"
            [apk]
            path = "out"
            [keystore]
            path = "k.jks"
            password = "hunter2"
            alias = "release"
            {}
            "#,
            extra
        );
        ConfigFile::parse(&content, Path::new("sideload.toml")).unwrap()
    }

    #[test]
    fn test_defaults_fill_gaps() {
        let config = RunConfig::new(BuiltinDefaults::default(), file(""), VersionRequest::Latest);
        assert_eq!(config.app_id, "org.krita");
        assert_eq!(config.required_space_gb, 1.5);
        assert_eq!(config.tools.adb, "adb");
        assert_eq!(config.artifact_dir, PathBuf::from("out"));
        assert_eq!(config.requested, VersionRequest::Latest);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = RunConfig::new(
            BuiltinDefaults::default(),
            file(
                r#"
                [ci]
                base_url = "https://ci.example.org/job/App_Nightly"
                verify_tls = false
                [app]
                id = "org.example.app"
                required_space_gb = 0.5
                [tools]
                adb = "/opt/platform-tools/adb"
                "#,
            ),
            VersionRequest::Pinned(BuildVersion::new(42)),
        );
        assert_eq!(config.ci_base_url, "https://ci.example.org/job/App_Nightly/");
        assert!(!config.verify_tls);
        assert_eq!(config.app_id, "org.example.app");
        assert_eq!(config.required_space_gb, 0.5);
        assert_eq!(config.tools.adb, "/opt/platform-tools/adb");
        assert_eq!(config.tools.jarsigner, "jarsigner");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = RunConfig::new(BuiltinDefaults::default(), file(""), VersionRequest::Latest);
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
