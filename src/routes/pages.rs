// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML search page and its form handlers.
//!
//! Every form post mutates the session and answers `303 See Other` back to
//! `/`, so reloading the page never resubmits a form.

use crate::render::render_page;
use crate::services::SessionId;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/page", post(change_page))
        .route("/favorites/{id}", post(toggle_favorite))
}

/// Render the search page.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> Html<String> {
    Html(render_page(&state.search.view(&session)))
}

#[derive(Deserialize)]
struct SearchForm {
    /// Empty keywords are valid and match everything
    #[serde(default)]
    keyword: String,
}

/// Start a new search.
async fn search(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    state.search.search(&session, &form.keyword).await;
    Redirect::to("/")
}

#[derive(Deserialize)]
struct PageForm {
    page: usize,
}

/// Navigate to another page of results.
async fn change_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<PageForm>,
) -> Redirect {
    state.search.goto_page(&session, form.page).await;
    Redirect::to("/")
}

/// Add or remove a favorite.
async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<u64>,
) -> Redirect {
    state.search.toggle_favorite(&session, id);
    Redirect::to("/")
}
