//! Run configuration
//!
//! Two layers are combined into an immutable `RunConfig`:
//! 1. Built-in defaults (CI job, app id, space requirement, tool names)
//! 2. The operator's TOML file (artifact directory, keystore, overrides)
//!
//! The requested build comes from the CLI or the version prompt and is fixed
//! when the `RunConfig` is built.

mod defaults;
mod file;
mod run_config;

pub use defaults::BuiltinDefaults;
pub use file::{ApkSection, AppSection, CiSection, ConfigFile, KeystoreSection, ToolsSection};
pub use run_config::{KeystoreConfig, RunConfig, ToolPaths};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "sideload.toml";
