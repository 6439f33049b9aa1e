use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StockbotError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid response table: {0}")]
    InvalidTable(String),

    #[error("invalid stock catalog: {0}")]
    InvalidCatalog(String),

    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed")]
    Server(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StockbotError>;
