//! jobctl CLI
//!
//! Command-line interface for driving a CI server's job lifecycle from
//! small YAML job configurations.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use jobctl_client::CredentialOverrides;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobctl")]
#[command(about = "Drive a CI server's job lifecycle from YAML job configs", long_about = None)]
struct Cli {
    /// Name of the CI server user
    #[arg(short = 'u', long, global = true, env = "JOBCTL_USERNAME")]
    username: Option<String>,

    /// Password of the CI server user
    #[arg(short = 'p', long, global = true, env = "JOBCTL_PASSWORD")]
    password: Option<String>,

    /// Base64-encoded password of the CI server user
    #[arg(short = 'b', long, global = true, env = "JOBCTL_PASSWORD_BASE64")]
    password_base64: Option<String>,

    /// CI server IP address or hostname
    #[arg(short = 's', long, global = true, env = "JOBCTL_SERVER_IP")]
    server_ip: Option<String>,

    /// CI server port
    #[arg(short = 'o', long, global = true, env = "JOBCTL_SERVER_PORT")]
    server_port: Option<u16>,

    /// Credentials file for communicating with the CI server
    #[arg(short = 'c', long, global = true, env = "JOBCTL_CREDS_FILE")]
    creds_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobctl=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let overrides = CredentialOverrides {
        username: cli.username,
        password: cli.password,
        password_base64: cli.password_base64,
        server_ip: cli.server_ip,
        server_port: cli.server_port,
        creds_file: cli.creds_file,
    };

    handle_command(cli.command, overrides).await
}
