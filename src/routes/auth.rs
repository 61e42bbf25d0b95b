// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-in and sign-out routes.

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::Redirect,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, session_cookie, session_removal_cookie};
use crate::services::{OidcError, VerifiedIdentity};
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a sign-in attempt may take before its state is rejected.
const STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
        .route("/auth/logout", post(logout))
}

/// Query parameters for starting the sign-in flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Local path to return to after sign-in (defaults to `/`).
    #[serde(default)]
    return_to: Option<String>,
}

/// Start sign-in - redirect to Google authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
) -> Result<Redirect> {
    let return_to = sanitize_return_path(params.return_to.as_deref());

    let oauth_state = sign_state(&return_to, now_millis()?, &state.config.oauth_state_key)?;

    let auth_url = state
        .google_auth
        .authorization_url(&state.config.oauth_callback_url(), &oauth_state);

    tracing::info!(return_to = %return_to, "Starting sign-in, redirecting to Google");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code, verify identity, create session.
///
/// Failures are logged and land the visitor back on the sign-in page.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Sign-in error from Google");
        return Ok((jar, Redirect::to("/")));
    }

    let now = now_millis()?;
    let return_to = match params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key, now))
    {
        Some(path) => path,
        None => {
            tracing::warn!("Invalid, expired or tampered state parameter, rejecting sign-in");
            return Ok((jar, Redirect::to("/")));
        }
    };

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("Sign-in callback without authorization code");
        return Ok((jar, Redirect::to("/")));
    };

    let identity = match complete_sign_in(&state, &code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            return Ok((jar, Redirect::to("/")));
        }
    };

    let jwt = create_jwt(&identity, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(subject = %identity.subject, "User signed in");

    let jar = jar.add(session_cookie(jwt, state.config.is_secure()));
    Ok((jar, Redirect::to(&return_to)))
}

/// Exchange the code and verify the returned ID token.
async fn complete_sign_in(state: &AppState, code: &str) -> Result<VerifiedIdentity> {
    let tokens = state
        .google_auth
        .exchange_code(code, &state.config.oauth_callback_url())
        .await?;

    state
        .google_oidc_verifier
        .verify_id_token(&tokens.id_token)
        .await
        .map_err(|e| match e {
            OidcError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "ID token rejected");
                AppError::InvalidToken
            }
            OidcError::Transient(reason) => AppError::IdentityProvider(reason),
        })
}

/// Sign out - clear the session cookie and return to the sign-in page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    tracing::info!("User signed out");
    let jar = jar.remove(session_removal_cookie(state.config.is_secure()));
    (jar, Redirect::to("/"))
}

/// Only same-site absolute paths that fit in a Location header are accepted.
fn sanitize_return_path(path: Option<&str>) -> String {
    match path {
        Some(p)
            if p.starts_with('/')
                && !p.starts_with("//")
                && !p.contains('\\')
                && HeaderValue::from_str(p).is_ok() =>
        {
            p.to_string()
        }
        _ => "/".to_string(),
    }
}

fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Build the signed state: base64url("return_to|timestamp_hex|signature_hex").
fn sign_state(return_to: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", return_to, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify signature and age of the state parameter, returning the return path.
fn verify_and_decode_state(state: &str, secret: &[u8], now_ms: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Return paths may contain '|', so split from the right.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let return_to = parts.next()?;

    let payload = format!("{}|{}", return_to, timestamp_hex);
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_at = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if now_ms.saturating_sub(issued_at) > STATE_MAX_AGE_MS || issued_at > now_ms + 60_000 {
        tracing::warn!("OAuth state expired");
        return None;
    }

    Some(sanitize_return_path(Some(return_to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"secret_key";
    const NOW: u128 = 1_700_000_000_000;

    #[test]
    fn test_verify_and_decode_state_success() {
        let state = sign_state("/", NOW, SECRET).unwrap();
        assert_eq!(
            verify_and_decode_state(&state, SECRET, NOW + 1000),
            Some("/".to_string())
        );
    }

    #[test]
    fn test_verify_and_decode_state_invalid_signature() {
        let payload = format!("/|{:x}|{}", NOW, "invalid_signature");
        let encoded = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        assert_eq!(verify_and_decode_state(&encoded, SECRET, NOW), None);
    }

    #[test]
    fn test_verify_and_decode_state_wrong_secret() {
        let state = sign_state("/", NOW, SECRET).unwrap();
        assert_eq!(verify_and_decode_state(&state, b"wrong_key", NOW), None);
    }

    #[test]
    fn test_verify_and_decode_state_malformed() {
        let encoded = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&encoded, SECRET, NOW), None);
        assert_eq!(verify_and_decode_state("not base64!!", SECRET, NOW), None);
    }

    #[test]
    fn test_verify_and_decode_state_expired() {
        let state = sign_state("/", NOW, SECRET).unwrap();
        assert_eq!(
            verify_and_decode_state(&state, SECRET, NOW + STATE_MAX_AGE_MS + 1),
            None
        );
    }

    #[test]
    fn test_sanitize_return_path() {
        assert_eq!(sanitize_return_path(None), "/");
        assert_eq!(sanitize_return_path(Some("/")), "/");
        assert_eq!(sanitize_return_path(Some("/?x=1")), "/?x=1");
        assert_eq!(sanitize_return_path(Some("//evil.example")), "/");
        assert_eq!(sanitize_return_path(Some("https://evil.example")), "/");
        assert_eq!(sanitize_return_path(Some("/\\evil.example")), "/");
        assert_eq!(sanitize_return_path(Some("/\n")), "/");
        assert_eq!(sanitize_return_path(Some("/a\r\nSet-Cookie: x=1")), "/");
    }

    #[test]
    fn test_state_with_control_characters_returns_home() {
        let state = sign_state("/\n", NOW, SECRET).unwrap();
        assert_eq!(
            verify_and_decode_state(&state, SECRET, NOW + 1000),
            Some("/".to_string())
        );
    }
}
