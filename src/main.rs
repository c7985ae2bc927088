use clap::Parser;
use runbeat::config::{RunbeatConfig, load_config};
use runbeat::context::AppContext;
use runbeat::server::ApiServer;
use runbeat::server::lifecycle::ExitReason;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Runbeat: scheduled one-shot task runner with an HTTP status API.
#[derive(Parser)]
#[command(name = "runbeat", version, about = "Runbeat - scheduled task runner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "runbeat.toml")]
    config: PathBuf,

    /// Bind address, overriding the config file
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overriding the config file
    #[arg(long)]
    port: Option<u16>,

    /// Serve without running the task at startup
    #[arg(long)]
    no_auto_run: bool,

    /// Keep serving after a successful auto-run instead of exiting
    #[arg(long)]
    no_exit: bool,
}

fn apply_overrides(mut config: RunbeatConfig, cli: &Cli) -> RunbeatConfig {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_auto_run {
        config.runner.auto_run = false;
    }
    if cli.no_exit {
        config.runner.exit_after_run = false;
    }
    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("runbeat=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(load_config(&cli.config), &cli);

    info!("Runbeat starting up");

    let ctx = AppContext::builder().with_config(config).build();
    match ApiServer::new(ctx).serve().await {
        Ok(ExitReason::Clean) => {
            info!("Runbeat shut down cleanly");
        }
        Ok(ExitReason::AutoRunFailure) => {
            error!("Exiting after failed auto-run");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Server error: {e}");
            std::process::exit(1);
        }
    }
}
