use crate::config::Config;
use crate::content::AssetContentServer;
use crate::slides::SlideResolver;
use crate::store::{SignageStore, SqliteStore};
use crate::templates::{DirTemplateRenderer, TemplateRenderer};
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};

mod error;
pub mod routes_content;
pub mod routes_player;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Screens, playlists and assets
    pub store: Arc<dyn SignageStore>,
    pub resolver: Arc<SlideResolver>,
    pub content: Arc<AssetContentServer>,
}

impl AppContext {
    /// Wire the resolver and content server from configuration.
    pub fn new(
        config: Config,
        store: Arc<dyn SignageStore>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        let resolver = SlideResolver::from_config(renderer, &config.player);
        let content = AssetContentServer::from_config(&config.player);
        Self {
            config: Arc::new(config),
            store,
            resolver: Arc::new(resolver),
            content: Arc::new(content),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let static_dir = ctx.config.server.static_dir.clone();

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(routes_player::player_routes(&ctx))
        .merge(routes_content::content_routes(&ctx))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Player script, stylesheet and other static files
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.fallback_service(ServeDir::new(&dir));
        } else {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Open the database and start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let db_path = config.server.database.clone();
    let pool = tokio::task::spawn_blocking(move || signage_db::pool::init_pool(&db_path.to_string_lossy()))
        .await
        .context("Database initialization task failed")?
        .with_context(|| format!("Failed to open database {:?}", config.server.database))?;
    tracing::info!("Database ready at {:?}", config.server.database);

    let store: Arc<dyn SignageStore> = Arc::new(SqliteStore::new(pool));
    let renderer: Arc<dyn TemplateRenderer> =
        Arc::new(DirTemplateRenderer::new(config.templates.dir.clone()));

    tracing::info!(
        screens = %config.player.screen_path,
        playlists = %config.player.playlist_path,
        assets = %config.player.asset_path,
        "Player routes"
    );

    let ctx = AppContext::new(config, store, renderer);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
