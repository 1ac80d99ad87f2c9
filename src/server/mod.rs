//! The dashboard API: a thin request/response façade over the state actor and the character
//! channel, consumed by the web frontend running on its own origin.

pub mod error;
pub mod handlers;

use std::path::PathBuf;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use crate::state::{actor::StateHandle, character::CharacterChannel};

use handlers::ApiState;

pub const DEFAULT_API_PORT: u16 = 5000;

/// Builds the full route table. The dashboard runs on a separate origin, so every route is
/// served with permissive CORS; `/assets` exposes the character sprites as plain files.
pub fn router(api: ApiState, assets_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/status", get(handlers::status))
        .route(
            "/api/data",
            get(handlers::get_data).post(handlers::replace_data),
        )
        .route("/api/mode", post(handlers::set_mode))
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::add_task),
        )
        .route(
            "/api/tasks/{id}",
            axum::routing::patch(handlers::toggle_task).delete(handlers::delete_task),
        )
        .route("/api/sentiment", post(handlers::log_sentiment))
        .route("/api/food", post(handlers::log_food))
        .route("/api/comfort", post(handlers::log_comfort))
        .route("/api/points", post(handlers::adjust_points))
        .route("/api/goal", post(handlers::set_goal))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(CorsLayer::permissive())
        .with_state(api)
}

/// Serves the API until the daemon is cancelled.
pub async fn run(
    port: u16,
    state: StateHandle,
    character: CharacterChannel,
    assets_dir: PathBuf,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = router(ApiState { state, character }, assets_dir);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("API listening on {:?}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}
