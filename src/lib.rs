// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Finder: keyword search over activity records
//!
//! This crate serves a single search page. Results are fetched from the
//! activities backend in batches of 100, cached per browser session, and
//! shown ten per page next to the session's favorites.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::SearchService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub search: SearchService,
}
