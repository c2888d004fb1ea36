//! Artifact naming

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::version::BuildVersion;

/// Suffix distinguishing the unsigned form of a package
pub const UNSIGNED_MARKER: &str = "-unsigned";

/// Where one build's package lives, and which form is current.
///
/// Both forms are derived from the same build; they differ only by
/// [`UNSIGNED_MARKER`]. Once the signed file exists it supersedes the
/// unsigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    unsigned: PathBuf,
    signed: PathBuf,
    is_signed: bool,
}

impl ArtifactLocation {
    /// Current path: signed if signing has happened, unsigned otherwise
    pub fn path(&self) -> &Path {
        if self.is_signed {
            &self.signed
        } else {
            &self.unsigned
        }
    }

    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    pub fn unsigned_path(&self) -> &Path {
        &self.unsigned
    }

    pub fn signed_path(&self) -> &Path {
        &self.signed
    }

    /// Whether either form is already on disk
    pub fn exists_any(&self) -> bool {
        self.unsigned.exists() || self.signed.exists()
    }

    /// The same artifact after signing
    pub fn into_signed(self) -> Self {
        Self {
            is_signed: true,
            ..self
        }
    }
}

/// File name stem shared by both forms, e.g. `krita_build_apk-release` for
/// `krita_build_apk-release-unsigned.apk`.
fn stem(artifact_name: &str) -> &str {
    let name = artifact_name.strip_suffix(".apk").unwrap_or(artifact_name);
    name.strip_suffix(UNSIGNED_MARKER).unwrap_or(name)
}

/// Name the artifacts for `build` under `dest_dir`:
/// `<stem>-<build>-unsigned.apk` and `<stem>-<build>.apk`.
pub fn locate(build: BuildVersion, dest_dir: &Path, artifact_name: &str) -> ArtifactLocation {
    let stem = stem(artifact_name);
    let signed = dest_dir.join(format!("{}-{}.apk", stem, build));
    let unsigned = dest_dir.join(format!("{}-{}{}.apk", stem, build, UNSIGNED_MARKER));
    let is_signed = signed.exists();

    ArtifactLocation {
        unsigned,
        signed,
        is_signed,
    }
}
