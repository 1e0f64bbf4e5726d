use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub mod health;
pub mod nodes;
pub mod sites;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(sites::router())
        .merge(nodes::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
