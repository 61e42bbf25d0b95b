// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Credit Risk Portal: a signed-in form for applicant credit-risk predictions
//!
//! This crate serves the web page, delegates classification to an external
//! prediction service, and logs each submission to Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use config::Config;
use services::{GoogleAuthClient, GoogleOidcVerifier, SubmissionProcessor};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub submissions: SubmissionProcessor,
    pub google_auth: GoogleAuthClient,
    pub google_oidc_verifier: Arc<GoogleOidcVerifier>,
}
