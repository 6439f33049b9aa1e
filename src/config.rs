use std::env;
use std::path::PathBuf;

use crate::cli::CliArgs;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` uses the embedded response table.
    pub responses_path: Option<PathBuf>,
    /// `None` uses the embedded stock catalog.
    pub stock_data_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            responses_path: None,
            stock_data_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            responses_path: non_empty("STOCKBOT_RESPONSES").map(PathBuf::from),
            stock_data_path: non_empty("STOCKBOT_STOCK_DATA").map(PathBuf::from),
            log_level: non_empty("STOCKBOT_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(path) = &args.responses {
            self.responses_path = Some(path.clone());
        }
        if let Some(path) = &args.stocks {
            self.stock_data_path = Some(path.clone());
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
