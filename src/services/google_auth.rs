// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth 2.0 client for the sign-in flow.
//!
//! Handles:
//! - Building the authorization redirect
//! - Exchanging the authorization code for an ID token

use crate::error::AppError;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPES: &str = "openid email profile";

/// Token endpoint response. Only the ID token is used; access tokens are discarded.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub id_token: String,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl GoogleAuthClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Point code exchange at a different token endpoint (local stubs).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Authorization URL the browser is redirected to.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=select_account",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Google token exchange failed");
            return Err(AppError::IdentityProvider(format!(
                "Token exchange returned HTTP {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("Invalid token response: {}", e)))
    }
}
