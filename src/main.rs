use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockbot::{build_app, cli::CliArgs, run_server, AppConfig, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = AppConfig::from_env().with_overrides(&args);
    init_tracing(&config.log_level);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = &err as &dyn std::error::Error, "stockbot failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> stockbot::Result<()> {
    let state = AppState::load(config)?;
    run_server(build_app(state), &config.bind_addr()).await
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
