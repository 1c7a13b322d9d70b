pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Init
        .route("/api/init", post(routes::init::init_store))
        // Districts
        .route("/api/districts", get(routes::districts::list_districts))
        .route("/api/districts", post(routes::districts::create_district))
        .route(
            "/api/districts/with-summaries",
            get(routes::districts::list_with_summaries),
        )
        .route("/api/districts/{slug}", get(routes::districts::get_district))
        .route(
            "/api/districts/{slug}",
            put(routes::districts::update_district),
        )
        .route(
            "/api/districts/{slug}",
            delete(routes::districts::delete_district),
        )
        .route(
            "/api/districts/{slug}/tree",
            get(routes::districts::get_tree),
        )
        // Goals
        .route("/api/districts/{slug}/goals", get(routes::goals::list_goals))
        .route(
            "/api/districts/{slug}/goals",
            post(routes::goals::create_goal),
        )
        .route(
            "/api/districts/{slug}/goals/next-number",
            get(routes::goals::next_number),
        )
        .route(
            "/api/districts/{slug}/goals/{id}",
            put(routes::goals::update_goal),
        )
        .route(
            "/api/districts/{slug}/goals/{id}",
            delete(routes::goals::delete_goal),
        )
        // Metrics
        .route(
            "/api/districts/{slug}/metrics",
            post(routes::metrics::create_metric),
        )
        .route(
            "/api/districts/{slug}/metrics/reorder",
            put(routes::metrics::reorder_metrics),
        )
        .route(
            "/api/districts/{slug}/metrics/batch",
            post(routes::metrics::batch_upsert),
        )
        .route(
            "/api/districts/{slug}/metrics/{id}",
            put(routes::metrics::update_metric),
        )
        .route(
            "/api/districts/{slug}/metrics/{id}",
            delete(routes::metrics::delete_metric),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the planbook API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("planbook API listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the planbook API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("planbook API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
