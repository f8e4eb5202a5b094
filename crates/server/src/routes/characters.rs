//! `GET /characters`: the cached listing as JSON.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};

use crate::state::AppState;

/// `{ "count": n, "characters": [{ "name", "location", "image" }, ...] }`
async fn list_characters(State(state): State<AppState>) -> Response {
    Json(state.cache.listing()).into_response()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/characters", get(list_characters))
}
