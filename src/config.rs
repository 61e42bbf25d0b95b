// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Six credential variables identify the Google OAuth client, the GCP project
//! hosting Firestore, and the keys used to sign sessions and OAuth state.

use std::env;

/// Default prediction endpoint (local model server).
pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:5000/predict";

/// Default Firestore collection for submission records.
pub const DEFAULT_SUBMISSIONS_COLLECTION: &str = "formSubmissions";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public, also the expected ID token audience)
    pub google_client_id: String,
    /// GCP project ID hosting Firestore
    pub gcp_project_id: String,
    /// Public base URL of this service, used for the OAuth callback
    pub public_url: String,
    /// Prediction service endpoint
    pub prediction_url: String,
    /// Firestore collection receiving submission records
    pub submissions_collection: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            gcp_project_id: "test-project".to_string(),
            public_url: "http://localhost:8080".to_string(),
            prediction_url: DEFAULT_PREDICTION_URL.to_string(),
            submissions_collection: DEFAULT_SUBMISSIONS_COLLECTION.to_string(),
            port: 8080,
            google_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key_32_bytes!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            prediction_url: env::var("PREDICTION_URL")
                .unwrap_or_else(|_| DEFAULT_PREDICTION_URL.to_string()),
            submissions_collection: env::var("SUBMISSIONS_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_SUBMISSIONS_COLLECTION.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: required("GOOGLE_CLIENT_SECRET")?,
            jwt_signing_key: required("JWT_SIGNING_KEY")?.into_bytes(),
            oauth_state_key: required("OAUTH_STATE_KEY")?.into_bytes(),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn is_secure(&self) -> bool {
        self.public_url.starts_with("https://")
    }

    /// Absolute OAuth redirect URI registered with Google.
    pub fn oauth_callback_url(&self) -> String {
        format!("{}/auth/google/callback", self.public_url)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("GOOGLE_CLIENT_ID", "test_id");
        env::set_var("GOOGLE_CLIENT_SECRET", " test_secret\n");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("OAUTH_STATE_KEY", "test_state_key");
        env::set_var("PUBLIC_URL", "https://risk.example.com/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.google_client_id, "test_id");
        assert_eq!(config.google_client_secret, "test_secret");
        assert_eq!(config.public_url, "https://risk.example.com");
        assert!(config.is_secure());
        assert_eq!(
            config.oauth_callback_url(),
            "https://risk.example.com/auth/google/callback"
        );
    }

    #[test]
    fn test_default_is_local_and_insecure() {
        let config = Config::test_default();
        assert!(!config.is_secure());
        assert_eq!(config.prediction_url, DEFAULT_PREDICTION_URL);
        assert_eq!(config.submissions_collection, "formSubmissions");
    }
}
