// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! What the search page shows, derived from a session.

use crate::models::Activity;
use crate::services::session::SearchSession;
use crate::time_utils::{format_local_date, format_utc_rfc3339};
use serde::Serialize;
use std::collections::HashMap;

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub id: u64,
    pub summary: String,
    pub project_name: String,
    pub type_label: String,
    pub user_name: String,
    /// RFC3339 creation time
    pub created: String,
    /// Creation date as displayed
    pub created_date: String,
    pub favorite: bool,
}

impl ActivityRow {
    fn new(activity: &Activity, favorite: bool) -> Self {
        Self {
            id: activity.id,
            summary: activity.display_summary().to_string(),
            project_name: activity.project_name.clone(),
            type_label: activity.display_type(),
            user_name: activity.user_name.clone(),
            created: format_utc_rfc3339(activity.created),
            created_date: format_local_date(activity.created),
            favorite,
        }
    }
}

/// Favorites of one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGroup {
    pub project_name: String,
    pub rows: Vec<ActivityRow>,
}

/// Pagination strip state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    /// Either a later loaded page exists or the backend may have more.
    pub has_next: bool,
}

impl Pagination {
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        1..=self.total_pages
    }
}

/// Everything the page renders.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub keyword: String,
    pub has_searched: bool,
    pub not_found: bool,
    /// Favorited ids, including ones not in the loaded results
    pub favorite_ids: Vec<u64>,
    /// Loaded favorites grouped by project, in order of first appearance
    pub favorite_groups: Vec<ProjectGroup>,
    /// Non-favorite rows of the current page
    pub results: Vec<ActivityRow>,
    pub loaded_records: usize,
    pub pagination: Option<Pagination>,
}

impl SearchView {
    pub fn build(session: &SearchSession) -> Self {
        let cache = session.cache();

        let favorites: Vec<&Activity> = cache
            .records()
            .filter(|a| session.is_favorite(a.id))
            .collect();

        let results = cache
            .page(session.current_page())
            .into_iter()
            .filter(|a| !session.is_favorite(a.id))
            .map(|a| ActivityRow::new(a, false))
            .collect();

        let mut favorite_ids: Vec<u64> = session.favorites().iter().copied().collect();
        favorite_ids.sort_unstable();

        let loaded_records = cache.len();
        let total_pages = cache.total_pages();
        let pagination = (session.has_searched() && total_pages > 0).then(|| Pagination {
            current_page: session.current_page(),
            total_pages,
            has_previous: session.current_page() > 1,
            has_next: session.current_page() < total_pages || session.has_more(),
        });

        Self {
            keyword: session.keyword().to_string(),
            has_searched: session.has_searched(),
            not_found: session.not_found(),
            favorite_ids,
            favorite_groups: group_by_project(&favorites),
            results,
            loaded_records,
            pagination,
        }
    }

    /// Whether the favorites section is shown at all.
    pub fn show_favorites(&self) -> bool {
        !self.favorite_ids.is_empty()
    }

    pub fn favorite_rows(&self) -> impl Iterator<Item = &ActivityRow> {
        self.favorite_groups.iter().flat_map(|g| g.rows.iter())
    }
}

fn group_by_project(items: &[&Activity]) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let slot = *index.entry(item.project_name.as_str()).or_insert_with(|| {
            groups.push(ProjectGroup {
                project_name: item.project_name.clone(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(ActivityRow::new(item, true));
    }

    groups
}
