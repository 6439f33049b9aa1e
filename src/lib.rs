pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;

use std::sync::Arc;

use axum::Router;

pub use catalog::StockCatalog;
pub use config::AppConfig;
pub use engine::{Reply, ResponseEngine, ResponseTable, ResponseTableBuilder};
pub use error::{Result, StockbotError};
pub use menu::{MenuReply, MenuTree, Segment};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResponseEngine>,
    pub menu: Arc<MenuTree>,
}

impl AppState {
    pub fn new(engine: ResponseEngine, menu: MenuTree) -> Self {
        Self {
            engine: Arc::new(engine),
            menu: Arc::new(menu),
        }
    }

    pub fn load(config: &AppConfig) -> Result<Self> {
        let builder = match &config.responses_path {
            Some(path) => ResponseTableBuilder::load(path)?,
            None => ResponseTableBuilder::embedded()?,
        };
        let catalog = match &config.stock_data_path {
            Some(path) => StockCatalog::load(path)?,
            None => StockCatalog::embedded()?,
        };

        let table = catalog.add_responses(builder).build()?;
        tracing::info!(
            keys = table.len(),
            exchanges = catalog.exchanges().len(),
            "response table ready"
        );

        Ok(Self::new(ResponseEngine::new(table), MenuTree::new(catalog)))
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StockbotError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    tracing::info!(%addr, "stockbot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StockbotError::Server)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
