// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie middleware.
//!
//! Every page and API request runs with a [`SessionId`] extension. Browsers
//! without a valid session cookie get a fresh id and a `Set-Cookie` header.

use crate::error::AppError;
use crate::services::SessionId;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "activity_finder_session";

/// Middleware that attaches the caller's session, creating one if needed.
pub async fn ensure_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let (session_id, new_jar) = match existing {
        Some(id) => (id, None),
        None => {
            let id = state.search.sessions().new_session_id()?;
            tracing::debug!(session = %id, "Starting new session");
            let jar = jar.add(session_cookie(&id, state.config.secure_cookies));
            (id, Some(jar))
        }
    };

    request.extensions_mut().insert(session_id);
    let response = next.run(request).await;

    Ok(match new_jar {
        Some(jar) => (jar, response).into_response(),
        None => response,
    })
}

fn session_cookie(id: &SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
