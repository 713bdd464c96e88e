//! HTTP layer exposing fresh safety reports and the public directory.

pub mod routes;
pub mod types;

use std::net::SocketAddr;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
}

/// Routes plus the static fallback, without binding a socket.
pub fn router(settings: Settings) -> Router {
    let static_dir = ServeDir::new(&settings.public_dir);
    let state = AppState { settings };
    Router::new()
        .route("/api/predictions", get(routes::predictions))
        .route("/api/summary", get(routes::summary))
        .fallback_service(static_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let router = router(settings);
    info!(%addr, "serving safety-scope API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
