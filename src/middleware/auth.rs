// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session JWT handling and authentication middleware.

use crate::error::AppError;
use crate::services::VerifiedIdentity;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "risk_session";

const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60; // 7 days

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Google account ID)
    pub sub: String,
    /// Display name shown in the welcome line
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Signed-in user extracted from the session JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Decode and validate a session token.
pub fn decode_session(token: &str, signing_key: &[u8]) -> Option<SessionUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation).ok()?.claims;

    if claims.sub.is_empty() {
        return None;
    }

    Some(SessionUser {
        subject: claims.sub,
        display_name: claims.name,
        email: claims.email,
    })
}

/// Session from the cookie, falling back to an `Authorization: Bearer` header.
pub fn session_from_parts(
    jar: &CookieJar,
    headers: &HeaderMap,
    signing_key: &[u8],
) -> Option<SessionUser> {
    // Try cookie first, then header
    let token = match jar.get(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))?
            .to_string(),
    };

    decode_session(&token, signing_key)
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_from_parts(&jar, request.headers(), &state.config.jwt_signing_key)
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Create a JWT for a signed-in user.
pub fn create_jwt(identity: &VerifiedIdentity, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: identity.subject.clone(),
        name: identity.display_name.clone(),
        email: identity.email.clone(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

fn base_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Session cookie set after a successful sign-in.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(token, secure);
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));
    cookie
}

/// Cookie template used to remove the session; attributes match creation.
pub fn session_removal_cookie(secure: bool) -> Cookie<'static> {
    base_cookie(String::new(), secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

    fn identity() -> VerifiedIdentity {
        VerifiedIdentity {
            subject: "10769150350006150715113082367".to_string(),
            email: Some("jsmith@example.com".to_string()),
            display_name: "Jane Smith".to_string(),
        }
    }

    #[test]
    fn jwt_roundtrip_keeps_identity() {
        let token = create_jwt(&identity(), KEY).unwrap();
        let user = decode_session(&token, KEY).unwrap();

        assert_eq!(user.subject, "10769150350006150715113082367");
        assert_eq!(user.display_name, "Jane Smith");
        assert_eq!(user.email.as_deref(), Some("jsmith@example.com"));
    }

    #[test]
    fn jwt_with_wrong_key_rejected() {
        let token = create_jwt(&identity(), KEY).unwrap();
        assert!(decode_session(&token, b"another_key_entirely_32_bytes!!").is_none());
        assert!(decode_session("garbage", KEY).is_none());
    }

    #[test]
    fn bearer_header_used_when_no_cookie() {
        let token = create_jwt(&identity(), KEY).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        let user = session_from_parts(&CookieJar::new(), &headers, KEY);
        assert_eq!(user.map(|u| u.display_name), Some("Jane Smith".to_string()));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(session_from_parts(&CookieJar::new(), &headers, KEY).is_none());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), true).to_string();
        assert!(cookie.starts_with("risk_session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));

        let local = session_cookie("tok".to_string(), false).to_string();
        assert!(!local.contains("Secure"));
    }
}
