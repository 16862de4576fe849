// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Search orchestration: session state transitions plus backend fetches.
//!
//! Fetch failures are logged and otherwise swallowed. The page simply keeps
//! showing what it had, which is the behavior users of the search page see.

use crate::models::SearchView;
use crate::services::activities::ActivitiesClient;
use crate::services::session::{FetchOutcome, FetchPlan, FetchTicket, SessionId, SessionStore};
use std::sync::Arc;

/// High-level search service shared by all request handlers.
#[derive(Clone)]
pub struct SearchService {
    client: ActivitiesClient,
    sessions: Arc<SessionStore>,
}

impl SearchService {
    pub fn new(client: ActivitiesClient, sessions: Arc<SessionStore>) -> Self {
        Self { client, sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Start a new search for `keyword` and load its first batch.
    pub async fn search(&self, session: &SessionId, keyword: &str) {
        let ticket = self
            .sessions
            .update(session, |state| state.begin_search(keyword));

        tracing::info!(
            session = %session,
            keyword,
            generation = ticket.generation,
            "Starting search"
        );

        self.run_fetch(session, ticket).await;
    }

    /// Navigate to `page`, loading its batch first if necessary.
    ///
    /// Returns the current page afterwards; out-of-range pages leave it as is.
    pub async fn goto_page(&self, session: &SessionId, page: usize) -> usize {
        let (plan, generation) = self
            .sessions
            .update(session, |state| (state.plan_page(page), state.generation()));

        match plan {
            Some(plan) => {
                self.execute(session, plan).await;
                // The page may only have become reachable once its batch loaded.
                self.sessions.update(session, |state| {
                    if state.generation() == generation {
                        state.change_page(page);
                    }
                    state.current_page()
                })
            }
            None => {
                tracing::debug!(session = %session, page, "Ignoring out-of-range page");
                self.sessions.read(session, |state| state.current_page())
            }
        }
    }

    /// Flip the favorite flag of one activity. Returns the new flag.
    pub fn toggle_favorite(&self, session: &SessionId, activity_id: u64) -> bool {
        let favorite = self
            .sessions
            .update(session, |state| state.toggle_favorite(activity_id));
        tracing::debug!(session = %session, activity_id, favorite, "Toggled favorite");
        favorite
    }

    /// Derive what the page should show for `session`.
    pub fn view(&self, session: &SessionId) -> SearchView {
        self.sessions.read(session, SearchView::build)
    }

    async fn execute(&self, session: &SessionId, plan: FetchPlan) {
        match plan {
            FetchPlan::Cached => {}
            FetchPlan::Fetch(ticket) => self.run_fetch(session, ticket).await,
            FetchPlan::Wait(mut done) => {
                tracing::debug!(session = %session, "Waiting for in-flight batch");
                // Nothing is ever sent; this resolves when the fetching
                // request drops its ticket.
                let _ = done.changed().await;
            }
        }
    }

    /// Fetch and store one batch on a detached task.
    ///
    /// The task runs to completion even if the calling request is dropped,
    /// so a batch the backend was asked for always reaches the session.
    async fn run_fetch(&self, session: &SessionId, ticket: FetchTicket) {
        let service = self.clone();
        let owner = session.clone();
        let task = tokio::spawn(async move { service.fetch_and_store(&owner, ticket).await });

        if let Err(e) = task.await {
            tracing::error!(error = %e, session = %session, "Activities fetch task failed");
        }
    }

    async fn fetch_and_store(&self, session: &SessionId, ticket: FetchTicket) {
        match self.client.fetch_batch(&ticket.keyword, ticket.batch).await {
            Ok(records) => {
                let count = records.len();
                let outcome = self
                    .sessions
                    .update(session, |state| state.complete_fetch(&ticket, records));

                match outcome {
                    FetchOutcome::Stored => tracing::debug!(
                        session = %session,
                        batch = ticket.batch,
                        count,
                        "Stored activities batch"
                    ),
                    FetchOutcome::Stale => tracing::debug!(
                        session = %session,
                        batch = ticket.batch,
                        generation = ticket.generation,
                        "Discarding batch from superseded search"
                    ),
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    session = %session,
                    keyword = %ticket.keyword,
                    batch = ticket.batch,
                    "Failed to fetch activities batch"
                );
                self.sessions
                    .update(session, |state| state.abandon_fetch(&ticket));
            }
        }
    }
}
