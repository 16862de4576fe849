// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_finder::error::AppError;
use activity_finder::services::ActivitiesClient;
use axum::{http::StatusCode, response::IntoResponse};
use std::time::Duration;

mod common;

#[test]
fn test_error_status_codes() {
    let cases = [
        (
            AppError::ActivitiesApi("down".to_string()),
            StatusCode::BAD_GATEWAY,
        ),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}

#[tokio::test]
async fn test_client_reports_http_status() {
    let backend = common::spawn_backend(Vec::new()).await;
    backend.set_failing(true);
    let client = ActivitiesClient::new(backend.url.clone(), Duration::from_secs(5)).unwrap();

    let err = client.fetch_batch("bug", 0).await.unwrap_err();
    assert!(matches!(err, AppError::ActivitiesApi(_)));
    assert!(err.to_string().contains(AppError::ACTIVITIES_HTTP_STATUS));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_client_reports_unreachable_backend() {
    // Nothing listens on the discard port.
    let client = ActivitiesClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let err = client.fetch_batch("bug", 0).await.unwrap_err();
    assert!(matches!(err, AppError::ActivitiesApi(_)));
}

#[tokio::test]
async fn test_client_requests_batch_offsets() {
    let backend = common::spawn_backend(common::activities(1, 250, "bug")).await;
    let client = ActivitiesClient::new(backend.url.clone(), Duration::from_secs(5)).unwrap();

    let batch = client.fetch_batch("bug", 2).await.unwrap();
    assert_eq!(batch.len(), 50);
    assert_eq!(batch[0].id, 201);
    assert_eq!(backend.requests()[0].offset, 200);
}
