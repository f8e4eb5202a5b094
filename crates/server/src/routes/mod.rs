//! HTTP routes over the cached catalog.
//!
//! Every handler reads the snapshot in `AppState`; none of them talk to the
//! upstream API or filter further.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod characters;
pub mod dashboard;
pub mod health;

/// Build the application router with tracing middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(dashboard::router())
        .merge(health::router())
        .merge(characters::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
