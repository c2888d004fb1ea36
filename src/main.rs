//! Nightly sideload CLI
//!
//! Entry point for the `nightly-sideload` command-line tool.

use clap::Parser;
use nightly_sideload::config::{BuiltinDefaults, ConfigFile, RunConfig, DEFAULT_CONFIG_FILE};
use nightly_sideload::operator::{acknowledge, ask_version, Operator, StdinOperator};
use nightly_sideload::{
    console, telemetry, BuildVersion, DataPolicy, DeployError, DeployResult, Pipeline,
    ReqwestClient, RunSummary, SystemRunner, VersionRequest,
};
use std::path::PathBuf;
use std::process;
use tracing::debug;

#[derive(Parser)]
#[command(name = "nightly-sideload")]
#[command(about = "Download, sign and install a nightly Android build", version)]
struct Cli {
    /// Path to config file (default: sideload.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Build number to deploy, skipping the version prompt
    #[arg(long, short = 'b', value_name = "N", conflicts_with = "latest")]
    build: Option<u64>,

    /// Deploy the latest build, skipping the version prompt
    #[arg(long)]
    latest: bool,

    /// Keep user data on reinstall without asking
    #[arg(long, conflicts_with = "wipe_data")]
    keep_data: bool,

    /// Wipe user data on reinstall without asking
    #[arg(long)]
    wipe_data: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose diagnostics on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn data_policy(&self) -> Option<DataPolicy> {
        if self.wipe_data {
            Some(DataPolicy::Wipe)
        } else if self.keep_data {
            Some(DataPolicy::Keep)
        } else {
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    telemetry::init_tracing(telemetry::level_for(cli.verbose));

    let mut operator = StdinOperator;

    match run(&cli, &mut operator) {
        Ok(summary) => {
            console::message("Done!");
            if cli.json {
                match summary.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => console::error(format!("could not serialize the run summary: {}", e)),
                }
            }
            if !cli.no_pause {
                acknowledge(&mut operator);
            }
        }
        Err(e) => {
            console::error(&e);
            for suggestion in e.suggestions() {
                console::message(format!("   - {}", suggestion));
            }
            if !cli.no_pause {
                acknowledge(&mut operator);
            }
            process::exit(e.exit_code());
        }
    }
}

fn run(cli: &Cli, operator: &mut dyn Operator) -> DeployResult<RunSummary> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let file = ConfigFile::load(&path)?;

    let requested = match cli.build {
        Some(n) => VersionRequest::Pinned(BuildVersion::new(n)),
        None if cli.latest => VersionRequest::Latest,
        None => ask_version(operator)?,
    };

    let config = RunConfig::new(BuiltinDefaults::default(), file, requested);
    debug!(?config, "effective configuration");

    let http = ReqwestClient::new(config.verify_tls).map_err(|e| DeployError::Network {
        context: "HTTP client setup".to_string(),
        reason: e.to_string(),
    })?;
    let runner = SystemRunner;

    Pipeline::new(&config, &http, &runner).run(operator, cli.data_policy())
}
