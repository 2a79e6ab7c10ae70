//! API Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────────────┐
//!                   │                      API GATEWAY                       │
//!                   │                                                        │
//!  Client Request   │  ┌──────────┐   ┌──────────┐   ┌──────────┐           │
//!  ─────────────────┼─▶│   net    │──▶│ logging  │──▶│ recovery │──┐        │
//!                   │  │ listener │   │middleware│   │middleware│  │        │
//!                   │  └──────────┘   └──────────┘   └──────────┘  ▼        │
//!                   │                                       ┌──────────┐    │
//!  Client Response  │                                       │ routing  │    │
//!  ◀────────────────┼───────────────────────────────────────│ + probes │    │
//!                   │                                       └──────────┘    │
//!                   │  ┌──────────────────────────────────────────────────┐ │
//!                   │  │               Cross-Cutting Concerns             │ │
//!                   │  │   config  ·  observability  ·  lifecycle         │ │
//!                   │  └──────────────────────────────────────────────────┘ │
//!                   └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use api_gateway::config::{load_config, EnvironmentProfile, ProcessEnv};
use api_gateway::lifecycle::{startup, ShutdownOutcome, StartupError};
use api_gateway::observability::{init_logging, resolve_log_config};
use api_gateway::RouteTable;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");
const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

const ENV_HELP: &str = "\
Environment Variables:
  PORT                 Server port (default: 8080)
  HOST                 Server host (default: 0.0.0.0)
  LOG_LEVEL            Log level (DEBUG, INFO, WARN, ERROR)
  LOG_FORMAT           Log format (json, text, pretty)
  LOG_SOURCE           Set to \"true\" to annotate log lines with file and line
  ENV                  Environment (production, development)
  METRICS_ADDRESS      Prometheus scrape address (disabled when unset)
  SHUTDOWN_GRACE_SECS  Grace period for in-flight requests (default: 30)";

/// Stashfi API Gateway
#[derive(Debug, Parser)]
#[command(name = "api-gateway", disable_version_flag = true, after_help = ENV_HELP)]
struct Cli {
    /// Show version information
    #[arg(long)]
    version: bool,

    /// TOML configuration file, applied before environment overrides
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("api-gateway version {}", VERSION);
        println!("Build time: {}", BUILD_TIME.unwrap_or("unknown"));
        println!("Git commit: {}", GIT_COMMIT.unwrap_or("unknown"));
        return ExitCode::SUCCESS;
    }

    let env = ProcessEnv;
    let log_config = resolve_log_config(&env);
    init_logging(&log_config);

    let config = match load_config(cli.config.as_deref(), &env) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        address = %config.listener.bind_address(),
        log_level = %log_config.level,
        log_format = %log_config.format,
        environment = %EnvironmentProfile::resolve(&env).name,
        version = VERSION,
        "Starting API gateway server"
    );

    let result = startup::run(config, RouteTable::with_probes()).await;
    ExitCode::from(exit_status(&result))
}

/// Process exit status for the end of the serve loop.
fn exit_status(result: &Result<ShutdownOutcome, StartupError>) -> u8 {
    match result {
        Ok(ShutdownOutcome::Clean) => {
            tracing::info!("Server shutdown complete");
            0
        }
        Ok(ShutdownOutcome::Forced { .. }) => 1,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            1
        }
    }
}
