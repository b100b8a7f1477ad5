use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{
    items::{service::EMPTY_DOCUMENT, ItemService},
    runtime,
    storage::{DocumentStore, FileDocumentStore, MemoryDocumentStore},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn open_store(cfg: &AppConfig) -> Result<Arc<dyn DocumentStore>, StartupError> {
    match cfg.storage.backend {
        StorageBackend::File => {
            runtime::ensure_env(&cfg.storage.frontend_dir, &cfg.storage.data_file).await?;
            let store = FileDocumentStore::new(&cfg.storage.data_file, EMPTY_DOCUMENT).await?;
            info!(path = %store.path().display(), "using file store");
            Ok(store as Arc<dyn DocumentStore>)
        }
        StorageBackend::Memory => {
            info!("using in-memory store; items are lost on exit");
            Ok(Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>)
        }
    }
}

/// Open the configured store and wrap it in handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    cfg.storage
        .validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let store = open_store(cfg).await?;
    let items = ItemService::new(store).with_pretty(cfg.storage.pretty);
    Ok(ServerState::new(items))
}

/// Build state and router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors(), &cfg.storage.frontend_dir))
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, data_file = %cfg.storage.data_file.display(), "starting item store server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: load config and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    serve(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C, draining connections");
    })
    .await
}
