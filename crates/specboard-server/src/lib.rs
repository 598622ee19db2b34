pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use specboard_core::config::Config;
use specboard_core::recent::RecentStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by [`serve_on`] and available for integration testing.
pub fn build_router(config: Config, recent: Box<dyn RecentStore>) -> Router {
    let app_state = state::AppState::new(config, recent);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Project snapshots
        .route("/api/project", get(routes::project::get_project))
        .route(
            "/api/project/features/{id}",
            get(routes::project::get_feature),
        )
        .route("/api/metrics", get(routes::metrics::get_metrics))
        // Live updates (SSE)
        .route("/api/watch", get(routes::watch::sse_watch))
        // Checklists
        .route(
            "/api/checklist/toggle",
            axum::routing::post(routes::checklist::toggle_checklist),
        )
        // Recent projects
        .route(
            "/api/recent",
            get(routes::recent::list_recent).post(routes::recent::add_recent),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the server on a pre-bound listener.
///
/// Lets the caller read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    config: Config,
    recent: Box<dyn RecentStore>,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(config, recent);

    tracing::info!("specboard API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/recent");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
