// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes for signed-in users.

use crate::error::{AppError, Result};
use crate::middleware::SessionUser;
use crate::models::{RiskLabel, SubmissionForm};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/predict", post(predict))
}

// ─── Session ─────────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Get the signed-in user.
async fn get_me(Extension(user): Extension<SessionUser>) -> Json<UserResponse> {
    Json(UserResponse {
        subject: user.subject,
        display_name: user.display_name,
        email: user.email,
    })
}

// ─── Prediction ──────────────────────────────────────────────

/// Prediction response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictResponse {
    /// Raw model output
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub prediction: serde_json::Number,
    pub label: RiskLabel,
}

/// Submit applicant attributes and get the risk label.
async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    WithRejection(Json(form), _): WithRejection<Json<SubmissionForm>, AppError>,
) -> Result<Json<PredictResponse>> {
    tracing::debug!(subject = %user.subject, "API prediction request");

    let prediction = state.submissions.submit(&form, &user.subject).await?;

    Ok(Json(PredictResponse {
        prediction: prediction.value,
        label: prediction.label,
    }))
}
