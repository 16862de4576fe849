// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON routes exposing the session's search view.

use crate::models::SearchView;
use crate::services::SessionId;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/view", get(get_view))
}

/// Current view of the caller's session, as the HTML page would show it.
async fn get_view(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> Json<SearchView> {
    Json(state.search.view(&session))
}
