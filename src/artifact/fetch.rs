//! Artifact download

use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::location::{locate, ArtifactLocation};
use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::http::HttpClient;
use crate::version::{BuildVersion, VersionRequest, VersionResolver};

/// Outcome of [`ArtifactFetcher::ensure_downloaded`]
#[derive(Debug, Clone, Serialize)]
pub struct Fetched {
    pub location: ArtifactLocation,
    /// False when an artifact was already on disk
    pub downloaded: bool,
    /// Size of the downloaded body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// SHA-256 of the downloaded body (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Downloads unsigned packages from the CI server
pub struct ArtifactFetcher<'a, H: HttpClient> {
    http: &'a H,
    base_url: &'a str,
    artifact_name: &'a str,
}

impl<'a, H: HttpClient> ArtifactFetcher<'a, H> {
    pub fn new(http: &'a H, base_url: &'a str, artifact_name: &'a str) -> Self {
        Self {
            http,
            base_url,
            artifact_name,
        }
    }

    /// Expected local paths for `build`
    pub fn locate(&self, build: BuildVersion, dest_dir: &Path) -> ArtifactLocation {
        locate(build, dest_dir, self.artifact_name)
    }

    /// `<base><build>/artifact/<artifact name>`
    pub fn download_url(&self, build: BuildVersion) -> String {
        format!("{}{}/artifact/{}", self.base_url, build, self.artifact_name)
    }

    /// Download the unsigned package unless either form is already present.
    ///
    /// A pinned build is validated against the index again right before the
    /// download: the retention window may have moved since resolution.
    pub fn ensure_downloaded(
        &self,
        location: ArtifactLocation,
        build: BuildVersion,
        request: &VersionRequest,
    ) -> DeployResult<Fetched> {
        if location.exists_any() {
            console::message("The current version is already downloaded");
            return Ok(Fetched {
                location,
                downloaded: false,
                bytes: None,
                sha256: None,
            });
        }

        if request.is_pinned() {
            VersionResolver::new(self.http, self.base_url).validate_requested(build)?;
        }

        let url = self.download_url(build);
        console::message(format!(
            "Downloading from: {} (it can take a few minutes)",
            url
        ));

        let response = self.http.get(&url).map_err(|e| DeployError::Network {
            context: "download".to_string(),
            reason: e.to_string(),
        })?;

        match response.status {
            403 => return Err(DeployError::NotBuilt(build)),
            status if !response.is_success() => {
                return Err(DeployError::Network {
                    context: "download".to_string(),
                    reason: format!("response status {}", status),
                })
            }
            _ => {}
        }

        console::message("Saving the downloaded file");
        let target = location.unsigned_path();
        write_atomically(target, &response.body)?;

        let sha256 = hex::encode(Sha256::digest(&response.body));
        debug!(path = %target.display(), bytes = response.body.len(), %sha256, "artifact saved");

        Ok(Fetched {
            location,
            downloaded: true,
            bytes: Some(response.body.len() as u64),
            sha256: Some(sha256),
        })
    }
}

/// Write via a hidden `.part` sibling and rename into place, so `target`
/// never holds a partial file.
fn write_atomically(target: &Path, content: &[u8]) -> DeployResult<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|e| DeployError::io(dir, e))?;
    }

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = dir.join(format!(".{}.part", file_name));

    if let Err(e) = fs::write(&temp_path, content) {
        if fs::remove_file(&temp_path).is_err() {
            warn!(path = %temp_path.display(), "could not remove partial download");
        }
        return Err(DeployError::io(&temp_path, e));
    }

    fs::rename(&temp_path, target).map_err(|e| DeployError::io(target, e))
}
