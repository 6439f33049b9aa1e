use std::path::PathBuf;

use clap::Parser;

/// Stockbot: a keyword chatbot that answers questions about stocks.
#[derive(Parser, Debug, Default)]
#[command(name = "stockbot", version, about)]
pub struct CliArgs {
    /// Address to bind the HTTP server to.
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP server port.
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// JSON response table to use instead of the embedded one.
    #[arg(short = 'r', long = "responses")]
    pub responses: Option<PathBuf>,

    /// JSON stock catalog to use instead of the embedded one.
    #[arg(short = 's', long = "stocks")]
    pub stocks: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` still wins.
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}
