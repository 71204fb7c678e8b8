mod analysis;
mod database;
mod health;
mod news;
mod pipeline;
mod simulation;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::AppState;

async fn index() -> Redirect {
    Redirect::temporary("/static/index.html")
}

/// Every API route plus the static frontend.
pub fn router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/news", news::routes())
        .nest("/api/analysis", analysis::routes())
        .nest("/api/simulation", simulation::routes())
        .nest("/api/database", database::routes())
        .nest("/api/pipeline", pipeline::routes())
        .route("/", get(index))
        .route_service("/game", ServeFile::new(static_dir.join("game.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
