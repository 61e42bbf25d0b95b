// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The application page: sign-in affordance or the prediction form.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::middleware::auth::session_from_parts;
use crate::models::SubmissionForm;
use crate::views::{self, FormView};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index).post(submit))
}

/// Render the page for the current session.
async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Html<String> {
    match session_from_parts(&jar, &headers, &state.config.jwt_signing_key) {
        Some(user) => Html(views::form_page(&user, &FormView::default())),
        None => Html(views::sign_in_page()),
    }
}

/// Handle a form submission and re-render with the outcome.
///
/// Success clears the form and shows the label. Failure keeps the entered
/// values, shows the error text and no prediction.
async fn submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<SubmissionForm>,
) -> Response {
    let Some(user) = session_from_parts(&jar, &headers, &state.config.jwt_signing_key) else {
        tracing::debug!("Form submitted without a session");
        return Redirect::to("/").into_response();
    };

    let view = match state.submissions.submit(&form, &user.subject).await {
        Ok(prediction) => FormView {
            form: SubmissionForm::default(),
            error: None,
            prediction: Some(prediction.label),
        },
        Err(e) => {
            tracing::info!(subject = %user.subject, error = %e, "Submission failed");
            FormView {
                error: Some(e.form_message()),
                prediction: None,
                form,
            }
        }
    };

    Html(views::form_page(&user, &view)).into_response()
}
