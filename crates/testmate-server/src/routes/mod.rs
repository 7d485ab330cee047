mod chat;
mod extract;
mod history;
mod identity;

pub use extract::{ApiJson, ApiQuery};
pub use identity::{CallerIdentity, IDENTITY_HEADER};

use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/v1", chat::router().merge(history::router()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
