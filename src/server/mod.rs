//! The HTTP server
//!
//! State assembly, routing, and launch. The OS listener is bound before the
//! async runtime touches it (see [`port`]), then handed to axum.

pub mod page;
pub mod port;
pub mod routes;

use crate::analysis::Analyzer;
use crate::config::Settings;
use crate::download::YtDlpDownloader;
use crate::error::Result;
use crate::types::SampleEntry;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Everything the handlers need, built once at startup
pub struct AppState {
    pub settings: Settings,
    pub samples: Vec<SampleEntry>,
    pub analyzer: Arc<dyn Analyzer>,
    pub downloader: YtDlpDownloader,
}

impl AppState {
    pub fn new(settings: Settings, samples: Vec<SampleEntry>, analyzer: Arc<dyn Analyzer>) -> Self {
        let downloader = YtDlpDownloader::new(&settings.temp_dir);
        Self {
            settings,
            samples,
            analyzer,
            downloader,
        }
    }
}

/// Build the application router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/samples", get(routes::list_samples))
        .route("/api/upload", post(routes::upload))
        .route("/api/download", post(routes::download))
        .route("/api/analyze", post(routes::analyze))
        .nest_service(
            "/files/samples",
            ServeDir::new(&state.settings.samples_dir),
        )
        .nest_service("/files/temp", ServeDir::new(&state.settings.temp_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind a listener per the port policy and serve until shutdown
pub async fn launch(state: Arc<AppState>) -> Result<()> {
    let (listener, bound_port) = port::bind(&state.settings)?;

    info!(
        "Serving samples from {}",
        state.settings.samples_dir.display()
    );
    info!("Writing outputs to {}", state.settings.temp_dir.display());
    if state.settings.share {
        info!("Share was requested; public tunnels are not provided, the server is LAN-only");
    }
    info!(
        "Listening on http://{}:{}",
        state.settings.host, bound_port
    );

    listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(listener)?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
