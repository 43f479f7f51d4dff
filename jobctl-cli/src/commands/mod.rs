//! Commands module
//!
//! Defines all CLI commands and routes them to their handlers. Every
//! command except `version` resolves credentials first and talks to the
//! remote server through one client held for the process lifetime.

mod job;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use jobctl_client::{CredentialOverrides, Credentials, JenkinsClient, TokioSleep};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load a job configuration and create the job on the server
    Create {
        /// Path to the YAML job configuration
        config: PathBuf,
    },
    /// Create the job if needed, build it, and watch the console output
    Start {
        /// Path to the YAML job configuration
        config: PathBuf,

        /// Seconds to wait before polling for console output
        #[arg(short, long, default_value_t = 5)]
        quiet_period: u64,

        /// Seconds to wait between console output polls
        #[arg(short, long, default_value_t = 5)]
        refresh_rate: u64,

        /// Delete the job from the server once the build finishes
        #[arg(short, long)]
        delete_after: bool,
    },
    /// Stop the currently running build of the job
    Stop {
        /// Path to the YAML job configuration
        config: PathBuf,
    },
    /// Attach to a running build and watch its console output
    Attach {
        /// Path to the YAML job configuration
        config: PathBuf,

        /// Seconds to wait between console output polls
        #[arg(short, long, default_value_t = 5)]
        refresh_rate: u64,

        /// Delete the job from the server once the build finishes
        #[arg(short, long)]
        delete_after: bool,
    },
    /// Print the console output of the job's last build
    Console {
        /// Path to the YAML job configuration
        config: PathBuf,

        /// Seconds to wait between console output polls
        #[arg(short, long, default_value_t = 5)]
        refresh_rate: u64,
    },
    /// Remove the job from the server
    Destroy {
        /// Path to the YAML job configuration
        config: PathBuf,

        /// Stop the build first if one is running
        #[arg(short, long)]
        force: bool,
    },
    /// Show the current version
    Version,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler. Credential resolution
/// failure is fatal: a diagnostic is printed and the process exits with
/// status 1 before any remote call is made.
pub async fn handle_command(command: Commands, overrides: CredentialOverrides) -> Result<()> {
    if matches!(command, Commands::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let credentials = match Credentials::resolve(&overrides) {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    debug!(server = %credentials.base_url, "resolved credentials");

    let client = JenkinsClient::new(credentials);
    let clock = TokioSleep;

    match command {
        Commands::Create { config } => job::create(&client, &config).await,
        Commands::Start {
            config,
            quiet_period,
            refresh_rate,
            delete_after,
        } => {
            job::start(
                &client,
                &clock,
                &config,
                job::StartOptions {
                    quiet_period: Duration::from_secs(quiet_period),
                    refresh_rate: Duration::from_secs(refresh_rate),
                    delete_after,
                },
            )
            .await
        }
        Commands::Stop { config } => job::stop(&client, &config).await,
        Commands::Attach {
            config,
            refresh_rate,
            delete_after,
        } => {
            job::attach(
                &client,
                &clock,
                &config,
                Duration::from_secs(refresh_rate),
                delete_after,
            )
            .await
        }
        Commands::Console {
            config,
            refresh_rate,
        } => job::console(&client, &clock, &config, Duration::from_secs(refresh_rate)).await,
        Commands::Destroy { config, force } => job::destroy(&client, &config, force).await,
        Commands::Version => unreachable!("handled above"),
    }
}
