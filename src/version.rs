//! Build version resolution against the CI index page.
//!
//! The artifact server keeps only the last `RETENTION_WINDOW` builds, so a
//! pinned request is checked against the latest stable build before any
//! download is attempted. Requests outside the window fail with a message
//! naming the oldest build that can still be fetched.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeployError, DeployResult};
use crate::http::HttpClient;

/// Number of most recent builds the CI server still serves artifacts for
pub const RETENTION_WINDOW: u64 = 5;

/// CI build number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildVersion(u64);

impl BuildVersion {
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn number(self) -> u64 {
        self.0
    }

    /// How many builds `latest` is ahead of `self` (zero if `self` is newer)
    pub fn distance_to(self, latest: BuildVersion) -> u64 {
        latest.0.saturating_sub(self.0)
    }

    /// Oldest build still inside the retention window when `self` is latest
    pub fn oldest_retained(self) -> BuildVersion {
        BuildVersion(self.0.saturating_sub(RETENTION_WINDOW - 1))
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which build the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "build")]
pub enum VersionRequest {
    Latest,
    Pinned(BuildVersion),
}

impl VersionRequest {
    /// Parse operator input. Blank means latest; a leading `#` is accepted.
    pub fn parse(input: &str) -> DeployResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(VersionRequest::Latest);
        }

        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(|n| VersionRequest::Pinned(BuildVersion::new(n)))
            .map_err(|_| DeployError::InvalidVersion(trimmed.to_string()))
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, VersionRequest::Pinned(_))
    }
}

/// Resolves build numbers against the CI job index page
pub struct VersionResolver<'a, H: HttpClient> {
    http: &'a H,
    base_url: &'a str,
}

impl<'a, H: HttpClient> VersionResolver<'a, H> {
    /// `base_url` is the CI job URL ending in `/`
    pub fn new(http: &'a H, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Fetch the index page and return the latest stable build
    pub fn resolve_latest(&self) -> DeployResult<BuildVersion> {
        let response = self
            .http
            .get(self.base_url)
            .map_err(|e| DeployError::Network {
                context: "version check".to_string(),
                reason: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(DeployError::Network {
                context: "version check".to_string(),
                reason: format!("response status {}", response.status),
            });
        }

        let latest = sideload_parse::parse_last_stable_build(&response.text())
            .map_err(|e| DeployError::Parse(e.to_string()))?;
        debug!(latest, "resolved latest stable build");

        Ok(BuildVersion::new(latest))
    }

    /// Check a pinned build against the retention window.
    ///
    /// Returns `requested` unchanged when `latest - requested < 5` and the
    /// build is not newer than latest.
    pub fn validate_requested(&self, requested: BuildVersion) -> DeployResult<BuildVersion> {
        let latest = self.resolve_latest()?;

        if requested > latest {
            return Err(DeployError::VersionNotFound { requested, latest });
        }
        if requested.distance_to(latest) >= RETENTION_WINDOW {
            return Err(DeployError::VersionTooOld {
                requested,
                oldest: latest.oldest_retained(),
            });
        }

        Ok(requested)
    }

    /// Resolve a request to a concrete build
    pub fn resolve(&self, request: &VersionRequest) -> DeployResult<BuildVersion> {
        match request {
            VersionRequest::Latest => self.resolve_latest(),
            VersionRequest::Pinned(build) => self.validate_requested(*build),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHttp;

    const BASE: &str = "https://ci.example.org/job/Nightly/";

    fn index(latest: u64) -> String {
        format!(
            "<html>\n<a href=\"lastStableBuild/\">Last stable build (#{}), 2 hr ago</a>\n</html>\n",
            latest
        )
    }

    fn http_with_latest(latest: u64) -> MockHttp {
        let http = MockHttp::new();
        http.respond(BASE, 200, index(latest));
        http
    }

    #[test]
    fn test_resolve_latest() {
        let http = http_with_latest(1234);
        let resolver = VersionResolver::new(&http, BASE);
        assert_eq!(resolver.resolve_latest().unwrap(), BuildVersion::new(1234));
    }

    #[test]
    fn test_non_success_status_is_network_error() {
        let http = MockHttp::new();
        http.respond(BASE, 503, "unavailable");
        let err = VersionResolver::new(&http, BASE).resolve_latest().unwrap_err();
        assert!(matches!(err, DeployError::Network { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_transport_failure_is_network_error() {
        let http = MockHttp::new();
        let err = VersionResolver::new(&http, BASE).resolve_latest().unwrap_err();
        assert!(matches!(err, DeployError::Network { .. }));
    }

    #[test]
    fn test_page_without_marker_is_parse_error() {
        let http = MockHttp::new();
        http.respond(BASE, 200, "<html>maintenance</html>");
        let err = VersionResolver::new(&http, BASE).resolve_latest().unwrap_err();
        assert!(matches!(err, DeployError::Parse(_)));
    }

    #[test]
    fn test_window_boundary() {
        let http = http_with_latest(1234);
        let resolver = VersionResolver::new(&http, BASE);

        for requested in 1230..=1234 {
            assert_eq!(
                resolver.validate_requested(BuildVersion::new(requested)).unwrap(),
                BuildVersion::new(requested)
            );
        }

        match resolver.validate_requested(BuildVersion::new(1229)) {
            Err(DeployError::VersionTooOld { requested, oldest }) => {
                assert_eq!(requested, BuildVersion::new(1229));
                assert_eq!(oldest, BuildVersion::new(1230));
            }
            other => panic!("expected VersionTooOld, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_holds_for_every_distance() {
        let latest = 500;
        let http = http_with_latest(latest);
        let resolver = VersionResolver::new(&http, BASE);

        for requested in 480..=latest {
            let result = resolver.validate_requested(BuildVersion::new(requested));
            if latest - requested < RETENTION_WINDOW {
                assert!(result.is_ok(), "build {} should be available", requested);
            } else {
                assert!(
                    matches!(result, Err(DeployError::VersionTooOld { oldest, .. }) if oldest == BuildVersion::new(latest - 4)),
                    "build {} should be too old",
                    requested
                );
            }
        }
    }

    #[test]
    fn test_newer_than_latest_is_not_found() {
        let http = http_with_latest(1234);
        let resolver = VersionResolver::new(&http, BASE);
        for requested in [1235, 1300, u64::MAX] {
            assert!(matches!(
                resolver.validate_requested(BuildVersion::new(requested)),
                Err(DeployError::VersionNotFound { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_dispatches_on_request() {
        let http = http_with_latest(77);
        let resolver = VersionResolver::new(&http, BASE);
        assert_eq!(
            resolver.resolve(&VersionRequest::Latest).unwrap(),
            BuildVersion::new(77)
        );
        assert_eq!(
            resolver
                .resolve(&VersionRequest::Pinned(BuildVersion::new(75)))
                .unwrap(),
            BuildVersion::new(75)
        );
        assert_eq!(http.request_count(BASE), 2);
    }

    #[test]
    fn test_parse_request() {
        assert_eq!(VersionRequest::parse("").unwrap(), VersionRequest::Latest);
        assert_eq!(VersionRequest::parse("  \n").unwrap(), VersionRequest::Latest);
        assert_eq!(
            VersionRequest::parse("1230").unwrap(),
            VersionRequest::Pinned(BuildVersion::new(1230))
        );
        assert_eq!(
            VersionRequest::parse("#1230\n").unwrap(),
            VersionRequest::Pinned(BuildVersion::new(1230))
        );
        assert!(matches!(
            VersionRequest::parse("latest-ish"),
            Err(DeployError::InvalidVersion(_))
        ));
        assert!(matches!(
            VersionRequest::parse("-3"),
            Err(DeployError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_oldest_retained_saturates() {
        assert_eq!(BuildVersion::new(2).oldest_retained(), BuildVersion::new(0));
        assert_eq!(BuildVersion::new(1234).oldest_retained(), BuildVersion::new(1230));
    }
}
