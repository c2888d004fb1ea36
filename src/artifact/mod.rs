//! Local package artifacts
//!
//! Handles the on-disk lifecycle of one build's package:
//! - naming the unsigned and signed files for a build
//! - downloading the unsigned package from the CI server
//! - signing it in place with jarsigner

mod fetch;
mod location;
mod signing;

pub use fetch::{ArtifactFetcher, Fetched};
pub use location::{locate, ArtifactLocation, UNSIGNED_MARKER};
pub use signing::{PackageSigner, JDK_HINT};
