// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activities;
pub mod cache;
pub mod search;
pub mod session;

pub use activities::ActivitiesClient;
pub use cache::{BatchCache, BATCH_SIZE, PAGE_SIZE};
pub use search::SearchService;
pub use session::{SearchSession, SessionId, SessionStore};
