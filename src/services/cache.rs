// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch cache for search results.
//!
//! The backend is queried in fixed batches of [`BATCH_SIZE`] records while
//! the page shows [`PAGE_SIZE`] records at a time, so one batch serves
//! several pages. Batch `b` always holds the records at backend offset
//! `b * BATCH_SIZE`.

use crate::models::Activity;
use std::collections::BTreeMap;

/// Records requested per backend call.
pub const BATCH_SIZE: usize = 100;

/// Records shown per page.
pub const PAGE_SIZE: usize = 10;

/// Batch index holding the first record of a 1-based page.
pub fn batch_for_page(page: usize) -> usize {
    (page.saturating_sub(1) * PAGE_SIZE) / BATCH_SIZE
}

/// Backend offset of a batch.
pub fn batch_offset(batch: usize) -> usize {
    batch * BATCH_SIZE
}

/// Loaded batches keyed by batch index, iterated in ascending order.
#[derive(Debug, Default, Clone)]
pub struct BatchCache {
    batches: BTreeMap<usize, Vec<Activity>>,
}

impl BatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, batch: usize) -> bool {
        self.batches.contains_key(&batch)
    }

    pub fn insert(&mut self, batch: usize, records: Vec<Activity>) {
        self.batches.insert(batch, records);
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// All loaded records, flattened in batch order.
    pub fn records(&self) -> impl Iterator<Item = &Activity> {
        self.batches.values().flatten()
    }

    /// Total number of loaded records.
    pub fn len(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pages the loaded records fill.
    pub fn total_pages(&self) -> usize {
        self.len().div_ceil(PAGE_SIZE)
    }

    /// Records on a 1-based page of the flattened results.
    pub fn page(&self, page: usize) -> Vec<&Activity> {
        if page == 0 {
            return Vec::new();
        }
        self.records()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Index of the batch following the last loaded one, if the backend may
    /// hold more records.
    ///
    /// The backend reports no total, so a full last batch is the only hint
    /// that another batch exists.
    pub fn next_batch(&self) -> Option<usize> {
        let (&last, records) = self.batches.iter().next_back()?;
        (records.len() == BATCH_SIZE).then_some(last + 1)
    }
}
