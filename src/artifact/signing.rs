//! Package signing with jarsigner
//!
//! jarsigner signs the unsigned file in place. Success is recognised only by
//! its confirmation line; after that the file is renamed to the signed name.
//! Any other clean exit leaves a package that cannot be trusted, so it is
//! removed.

use std::fs;

use sideload_parse::{classify_sign_output, SignOutcome};
use tracing::debug;

use super::location::ArtifactLocation;
use crate::config::KeystoreConfig;
use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::process::{redacted_command_line, CommandRunner, ProcessError};

/// Shown when the signing tool is not installed
pub const JDK_HINT: &str =
    ", please ensure that the latest JDK is installed and added to the system path";

/// Signs artifacts through an external jarsigner-compatible tool
pub struct PackageSigner<'a, R: CommandRunner> {
    runner: &'a R,
    tool: &'a str,
}

impl<'a, R: CommandRunner> PackageSigner<'a, R> {
    pub fn new(runner: &'a R, tool: &'a str) -> Self {
        Self { runner, tool }
    }

    /// Sign `location` unless its signed form already exists.
    pub fn sign(
        &self,
        location: ArtifactLocation,
        keystore: &KeystoreConfig,
    ) -> DeployResult<ArtifactLocation> {
        if location.signed_path().exists() {
            console::message("apk is already signed");
            return Ok(location.into_signed());
        }

        console::message("Signing the apk (it can take a few minutes)");

        let keystore_path = keystore.path.to_string_lossy().into_owned();
        let artifact = location.unsigned_path().to_string_lossy().into_owned();
        let args: [&str; 6] = [
            "-keystore",
            keystore_path.as_str(),
            "-storepass",
            keystore.password.as_str(),
            artifact.as_str(),
            keystore.alias.as_str(),
        ];
        debug!(
            command = %redacted_command_line(self.tool, &args, "-storepass"),
            "running signer"
        );

        let output = self.runner.run(self.tool, &args).map_err(|e| match e {
            ProcessError::NotFound(tool) => DeployError::ToolMissing {
                tool,
                hint: JDK_HINT,
            },
            other => DeployError::SigningFailed {
                reason: other.to_string(),
            },
        })?;

        if !output.success {
            debug!(code = ?output.code, output = %output.text, "signer exited with failure");
            return Err(DeployError::SigningFailed {
                reason: format!(
                    "{} exited with {}, please check the keystore details in the config file",
                    self.tool,
                    output
                        .code
                        .map(|c| format!("status {}", c))
                        .unwrap_or_else(|| "a signal".to_string())
                ),
            });
        }

        match classify_sign_output(&output.text) {
            SignOutcome::Signed => {
                fs::rename(location.unsigned_path(), location.signed_path())
                    .map_err(|e| DeployError::io(location.unsigned_path(), e))?;
                console::message("Signing successful");
                Ok(location.into_signed())
            }
            SignOutcome::Rejected => {
                debug!(output = %output.text, "signer output lacked confirmation");
                fs::remove_file(location.unsigned_path())
                    .map_err(|e| DeployError::io(location.unsigned_path(), e))?;
                Err(DeployError::SigningFailed {
                    reason: "the signing tool did not confirm the signature, removing file"
                        .to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::locate;
    use crate::mock::ScriptedRunner;
    use crate::process::ToolOutput;
    use crate::version::BuildVersion;
    use std::path::{Path, PathBuf};

    const NAME: &str = "krita_build_apk-release-unsigned.apk";

    fn keystore() -> KeystoreConfig {
        KeystoreConfig {
            path: PathBuf::from("release.jks"),
            password: "hunter2".to_string(),
            alias: "release".to_string(),
        }
    }

    fn unsigned_artifact(dir: &Path) -> ArtifactLocation {
        let loc = locate(BuildVersion::new(1234), dir, NAME);
        fs::write(loc.unsigned_path(), b"apk").unwrap();
        loc
    }

    #[test]
    fn test_confirmation_renames_to_signed() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.on("jarsigner", ToolOutput::ok("jar signed."));

        let loc = unsigned_artifact(dir.path());
        let signed = PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap();

        assert!(signed.is_signed());
        assert!(signed.signed_path().exists());
        assert!(!signed.unsigned_path().exists());
        assert_eq!(fs::read(signed.path()).unwrap(), b"apk");
    }

    #[test]
    fn test_invocation_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.on("jarsigner", ToolOutput::ok("jar signed."));

        let loc = unsigned_artifact(dir.path());
        let artifact = loc.unsigned_path().to_string_lossy().into_owned();
        PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![vec![
                "jarsigner".to_string(),
                "-keystore".to_string(),
                "release.jks".to_string(),
                "-storepass".to_string(),
                "hunter2".to_string(),
                artifact,
                "release".to_string(),
            ]]
        );
    }

    #[test]
    fn test_already_signed_skips_tool() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let loc = locate(BuildVersion::new(1234), dir.path(), NAME);
        fs::write(loc.signed_path(), b"signed apk").unwrap();

        let signed = PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap();

        assert!(signed.is_signed());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_unconfirmed_output_deletes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.on(
            "jarsigner",
            ToolOutput::ok("jarsigner: unable to open jar file"),
        );

        let loc = unsigned_artifact(dir.path());
        let unsigned = loc.unsigned_path().to_path_buf();
        let err = PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap_err();

        assert!(matches!(err, DeployError::SigningFailed { .. }));
        assert!(!unsigned.exists());
    }

    #[test]
    fn test_non_zero_exit_keeps_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.on(
            "jarsigner",
            ToolOutput::failed(1, "jarsigner error: java.io.IOException: keystore password was incorrect"),
        );

        let loc = unsigned_artifact(dir.path());
        let unsigned = loc.unsigned_path().to_path_buf();
        let err = PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap_err();

        assert!(matches!(err, DeployError::SigningFailed { .. }));
        assert!(err.to_string().contains("keystore"));
        assert!(!err.to_string().contains("hunter2"));
        assert!(unsigned.exists());
    }

    #[test]
    fn test_missing_tool_is_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.missing("jarsigner");

        let loc = unsigned_artifact(dir.path());
        let err = PackageSigner::new(&runner, "jarsigner")
            .sign(loc, &keystore())
            .unwrap_err();

        assert!(matches!(err, DeployError::ToolMissing { ref tool, .. } if tool == "jarsigner"));
        assert!(err.to_string().contains("JDK"));
        assert_eq!(err.exit_code(), 40);
    }
}
