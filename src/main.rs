// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credit Risk Portal Server
//!
//! Serves the sign-in gated prediction form, forwards submissions to the
//! prediction service and logs them to Firestore.

use credit_risk_portal::{
    config::Config,
    db::FirestoreDb,
    services::{GoogleAuthClient, GoogleOidcVerifier, PredictionClient, SubmissionProcessor},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Credit Risk Portal");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id, &config.submissions_collection).await?;

    let prediction_client = PredictionClient::new(config.prediction_url.clone());
    tracing::info!(endpoint = %prediction_client.endpoint(), "Prediction client initialized");

    let google_oidc_verifier = Arc::new(GoogleOidcVerifier::new(&config)?);

    let google_auth = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        submissions: SubmissionProcessor::new(prediction_client, db),
        google_auth,
        google_oidc_verifier,
    });

    // Build router
    let app = credit_risk_portal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("credit_risk_portal=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .try_init()?;

    Ok(())
}
