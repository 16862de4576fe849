// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the activities backend.
//!
//! The backend exposes a single endpoint:
//! `GET /activities?keyword=..&offset=..&count=..` returning a JSON array of
//! [`Activity`] records. It reports no total count.

use crate::error::AppError;
use crate::models::Activity;
use crate::services::cache::{batch_offset, BATCH_SIZE};
use std::time::Duration;

/// Activities backend client.
#[derive(Clone)]
pub struct ActivitiesClient {
    http: reqwest::Client,
    base_url: String,
}

impl ActivitiesClient {
    /// Create a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch one batch of records matching `keyword`.
    pub async fn fetch_batch(
        &self,
        keyword: &str,
        batch: usize,
    ) -> Result<Vec<Activity>, AppError> {
        self.list_activities(keyword, batch_offset(batch), BATCH_SIZE)
            .await
    }

    /// List activities at an arbitrary offset.
    pub async fn list_activities(
        &self,
        keyword: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/activities", self.base_url);

        tracing::debug!(keyword, offset, count, "Requesting activities");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("keyword", keyword.to_string()),
                ("offset", offset.to_string()),
                ("count", count.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ActivitiesApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ActivitiesApi(format!(
                "{} {}: {}",
                AppError::ACTIVITIES_HTTP_STATUS,
                status,
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ActivitiesApi(format!("JSON parse error: {}", e)))
    }
}
