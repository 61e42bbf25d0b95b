// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use credit_risk_portal::error::AppError;

#[test]
fn test_form_message_for_validation() {
    let err = AppError::Validation(AppError::MISSING_FIELDS.to_string());
    assert_eq!(err.form_message(), "All fields are required!");
}

#[test]
fn test_form_message_wraps_request_failures() {
    let err = AppError::PredictionService("Request failed with status code 500".to_string());
    assert_eq!(
        err.form_message(),
        "Error predicting risk: Request failed with status code 500"
    );

    let err = AppError::Database("deadline exceeded".to_string());
    assert_eq!(err.form_message(), "Error predicting risk: deadline exceeded");
}

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
        (AppError::PredictionService("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::IdentityProvider("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}
