// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record as served by the activities backend.

use crate::time_utils::deserialize_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of a missing summary.
pub const NO_SUBJECT: &str = "(no subject)";

/// One activity record. Read-only to this application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID, unique across the backend
    pub id: u64,
    /// Project the activity belongs to
    pub project_name: String,
    /// Subject line, if the activity has one
    #[serde(default)]
    pub summary: Option<String>,
    /// Name of the user who created the activity
    pub user_name: String,
    /// Numeric activity type code
    #[serde(rename = "type")]
    pub activity_type: i32,
    /// Human-readable label for `activity_type`
    #[serde(default)]
    pub type_label: Option<String>,
    /// Creation time
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created: DateTime<Utc>,
}

impl Activity {
    /// Summary text for display.
    pub fn display_summary(&self) -> &str {
        self.summary.as_deref().unwrap_or(NO_SUBJECT)
    }

    /// Type label for display, falling back to the raw code.
    pub fn display_type(&self) -> String {
        match &self.type_label {
            Some(label) => label.clone(),
            None => format!("Unknown type ({})", self.activity_type),
        }
    }
}
