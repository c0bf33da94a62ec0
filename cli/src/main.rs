//! `ballot`: replays scripted voting rounds and prints a JSON report.

mod config;
mod script;

use ballot_governance::{Ballot, EventLog};
use ballot_types::Identity;
use ballot_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

use crate::config::BallotConfig;
use crate::script::Script;

#[derive(Parser)]
#[command(name = "ballot", about = "Single-round permissioned ballot runner")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Administrator identity (0x-prefixed, 40 hex digits).
    #[arg(long, env = "BALLOT_ADMIN")]
    admin: Option<Identity>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a script of `[[step]]` entries against a fresh ballot.
    Run {
        /// Path to the TOML script.
        #[arg(long)]
        script: PathBuf,

        /// Stop at the first failed step and exit non-zero.
        #[arg(long)]
        fail_fast: bool,

        /// Print the report on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Validate the configuration and print the effective values.
    CheckConfig,
}

impl Cli {
    /// File config (or defaults) with flag and env overrides applied.
    fn effective_config(&self) -> anyhow::Result<BallotConfig> {
        let mut config = match &self.config {
            Some(path) => BallotConfig::from_toml_file(path)?,
            None => BallotConfig::default(),
        };
        if let Some(admin) = self.admin {
            config.admin = Some(admin);
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config()?;

    ballot_utils::init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match &cli.command {
        Command::Run {
            script,
            fail_fast,
            compact,
        } => {
            let admin = config.require_admin()?;
            let script = Script::from_toml_file(script)?;
            let events = if config.record_events {
                EventLog::new()
            } else {
                EventLog::disabled()
            };
            let mut ballot = Ballot::with_event_log(admin, events);

            tracing::info!(%admin, steps = script.steps.len(), "running script");
            let report = script::run(&mut ballot, &script, *fail_fast);

            let json = if *compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");

            if let Err(violation) = ballot.check_invariants() {
                anyhow::bail!("ballot state is inconsistent: {violation}");
            }
            if *fail_fast && report.failures() > 0 {
                anyhow::bail!("script stopped after {} step(s)", report.steps.len());
            }
        }
        Command::CheckConfig => {
            let admin = config.require_admin()?;
            tracing::info!(%admin, record_events = config.record_events, "config is valid");
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
