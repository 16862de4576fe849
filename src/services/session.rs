// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-browser search sessions.
//!
//! Each session owns its own view state: keyword, batch cache, current page
//! and favorites. State transitions are synchronous; the network fetch
//! happens outside the session lock and is reconciled through a
//! [`FetchTicket`].

use crate::error::AppError;
use crate::models::Activity;
use crate::services::cache::{batch_for_page, BatchCache};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::watch;

const SESSION_ID_BYTES: usize = 16;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn generate(rng: &SystemRandom) -> Result<Self, AppError> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rng.fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate session id")))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Accept a cookie value only if it has the shape of a generated id.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == SESSION_ID_BYTES * 2
            && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Claim on one batch fetch for one search.
///
/// Dropping the ticket (whether the fetch finished or was abandoned) wakes
/// every request waiting on the same batch.
#[derive(Debug)]
pub struct FetchTicket {
    pub generation: u64,
    pub keyword: String,
    pub batch: usize,
    _done: watch::Sender<()>,
}

/// What a caller has to do to get a batch into the cache.
#[derive(Debug)]
pub enum FetchPlan {
    /// Already cached, nothing to do.
    Cached,
    /// Issue the request.
    Fetch(FetchTicket),
    /// Another request is already fetching this batch; wait for it.
    Wait(watch::Receiver<()>),
}

/// Outcome of reconciling a finished fetch with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Stored,
    /// The session moved on to another search; the response was dropped.
    Stale,
}

/// View state of one browser session.
#[derive(Debug)]
pub struct SearchSession {
    keyword: String,
    cache: BatchCache,
    current_page: usize,
    favorites: HashSet<u64>,
    not_found: bool,
    has_searched: bool,
    generation: u64,
    in_flight: HashMap<usize, watch::Receiver<()>>,
    last_seen: Instant,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            keyword: String::new(),
            cache: BatchCache::new(),
            current_page: 1,
            favorites: HashSet::new(),
            not_found: false,
            has_searched: false,
            generation: 0,
            in_flight: HashMap::new(),
            last_seen: Instant::now(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn cache(&self) -> &BatchCache {
        &self.cache
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.cache.total_pages()
    }

    pub fn favorites(&self) -> &HashSet<u64> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(&id)
    }

    pub fn not_found(&self) -> bool {
        self.not_found
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new search: forget everything loaded so far and claim batch 0.
    ///
    /// Favorites survive.
    pub fn begin_search(&mut self, keyword: impl Into<String>) -> FetchTicket {
        self.keyword = keyword.into();
        self.cache.clear();
        self.current_page = 1;
        self.not_found = false;
        self.has_searched = true;
        self.generation += 1;
        self.in_flight.clear();
        self.claim(0)
    }

    /// Decide how to get `batch` into the cache for the current search.
    pub fn plan_fetch(&mut self, batch: usize) -> FetchPlan {
        if !self.has_searched || self.cache.contains(batch) {
            return FetchPlan::Cached;
        }
        if let Some(rx) = self.in_flight.get(&batch) {
            // A closed channel means the fetching request went away.
            if rx.has_changed().is_ok() {
                return FetchPlan::Wait(rx.clone());
            }
        }
        FetchPlan::Fetch(self.claim(batch))
    }

    /// Plan the fetch needed to show `page`.
    ///
    /// Returns `None` when `page` is neither a loaded page nor the page right
    /// after the loaded ones while more batches may exist.
    pub fn plan_page(&mut self, page: usize) -> Option<FetchPlan> {
        if self.change_page(page) {
            return Some(self.plan_fetch(batch_for_page(self.current_page)));
        }
        if self.is_next_unloaded_page(page) {
            return Some(self.plan_fetch(batch_for_page(page)));
        }
        None
    }

    /// Move to `page` if it is within the loaded pages.
    pub fn change_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Whether more records may exist past the loaded ones.
    pub fn has_more(&self) -> bool {
        self.has_searched && self.cache.next_batch().is_some()
    }

    fn is_next_unloaded_page(&self, page: usize) -> bool {
        page == self.total_pages() + 1 && self.cache.next_batch() == Some(batch_for_page(page))
    }

    /// Store a fetched batch if it still belongs to the current search.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        records: Vec<Activity>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale;
        }
        self.in_flight.remove(&ticket.batch);
        if ticket.batch == 0 {
            self.not_found = records.is_empty();
        }
        self.cache.insert(ticket.batch, records);
        FetchOutcome::Stored
    }

    /// Release a failed fetch so a later request may retry it.
    pub fn abandon_fetch(&mut self, ticket: &FetchTicket) {
        if ticket.generation == self.generation {
            self.in_flight.remove(&ticket.batch);
        }
    }

    /// Add `id` to favorites, or remove it if already present.
    ///
    /// Returns whether the id is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    fn claim(&mut self, batch: usize) -> FetchTicket {
        let (tx, rx) = watch::channel(());
        self.in_flight.insert(batch, rx);
        FetchTicket {
            generation: self.generation,
            keyword: self.keyword.clone(),
            batch,
            _done: tx,
        }
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

/// All live sessions, keyed by session id.
pub struct SessionStore {
    sessions: DashMap<SessionId, SearchSession>,
    rng: SystemRandom,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            rng: SystemRandom::new(),
            idle_ttl,
        }
    }

    /// Mint an id for a new browser.
    pub fn new_session_id(&self) -> Result<SessionId, AppError> {
        SessionId::generate(&self.rng)
    }

    /// Run a state transition on a session, creating it if needed.
    ///
    /// The entry stays locked for the duration of `f`, which must not block.
    pub fn update<R>(&self, id: &SessionId, f: impl FnOnce(&mut SearchSession) -> R) -> R {
        let mut session = self.sessions.entry(id.clone()).or_default();
        session.touch();
        f(&mut session)
    }

    /// Read a session; unknown ids see a fresh session.
    ///
    /// Reading counts as activity for the idle TTL.
    pub fn read<R>(&self, id: &SessionId, f: impl FnOnce(&SearchSession) -> R) -> R {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.touch();
                f(&session)
            }
            None => f(&SearchSession::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle longer than the TTL. Returns how many were removed.
    pub fn purge_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.idle_for() < self.idle_ttl);
        before.saturating_sub(self.sessions.len())
    }
}
