// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, routing::post, Json, Router};
use credit_risk_portal::config::Config;
use credit_risk_portal::db::FirestoreDb;
use credit_risk_portal::middleware::auth::{create_jwt, SESSION_COOKIE};
use credit_risk_portal::routes::create_router;
use credit_risk_portal::services::{
    GoogleAuthClient, GoogleOidcVerifier, PredictionClient, SubmissionProcessor, VerifiedIdentity,
};
use credit_risk_portal::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Endpoint that refuses connections; any network attempt fails fast.
#[allow(dead_code)]
pub const UNREACHABLE_PREDICTION_URL: &str = "http://127.0.0.1:9/predict";

/// Key ID used by the static OIDC verifier in tests.
#[allow(dead_code)]
pub const TEST_OIDC_KID: &str = "test-kid";

#[allow(dead_code)]
pub const TEST_OIDC_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/test_oidc_private.pem");
#[allow(dead_code)]
pub const TEST_OIDC_PUBLIC_PEM: &[u8] = include_bytes!("../fixtures/test_oidc_public.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", "formSubmissions_test")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build a test app around the given prediction endpoint and store.
#[allow(dead_code)]
pub fn create_test_app_with(
    prediction_url: &str,
    db: FirestoreDb,
    token_url: Option<&str>,
) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.prediction_url = prediction_url.to_string();

    let decoding_key = jsonwebtoken::DecodingKey::from_rsa_pem(TEST_OIDC_PUBLIC_PEM)
        .expect("test public key should parse");
    let verifier = GoogleOidcVerifier::new_with_static_key(&config, TEST_OIDC_KID, decoding_key)
        .expect("static verifier should build");

    let mut google_auth = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );
    if let Some(url) = token_url {
        google_auth = google_auth.with_token_url(url);
    }

    let state = Arc::new(AppState {
        submissions: SubmissionProcessor::new(PredictionClient::new(prediction_url), db),
        google_auth,
        google_oidc_verifier: Arc::new(verifier),
        config,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(UNREACHABLE_PREDICTION_URL, FirestoreDb::new_mock(), None)
}

/// Session JWT for a fixed test user.
#[allow(dead_code)]
pub fn create_test_jwt(signing_key: &[u8]) -> String {
    let identity = VerifiedIdentity {
        subject: "1234567890".to_string(),
        email: Some("ada@example.com".to_string()),
        display_name: "Ada Lovelace".to_string(),
    };
    create_jwt(&identity, signing_key).expect("JWT should encode")
}

/// `Cookie` header value carrying a valid session.
#[allow(dead_code)]
pub fn session_cookie_header(state: &AppState) -> String {
    format!(
        "{}={}",
        SESSION_COOKIE,
        create_test_jwt(&state.config.jwt_signing_key)
    )
}

/// Handle to a local stand-in for the prediction service.
#[allow(dead_code)]
pub struct PredictionStub {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
    pub last_body: Arc<Mutex<Option<serde_json::Value>>>,
}

#[allow(dead_code)]
impl PredictionStub {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<serde_json::Value> {
        self.last_body.lock().unwrap().clone()
    }
}

/// Serve `POST /predict` on an ephemeral port, answering with `status` and `body`.
#[allow(dead_code)]
pub async fn spawn_prediction_stub(status: StatusCode, body: serde_json::Value) -> PredictionStub {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_body = Arc::new(Mutex::new(None));

    let handler_hits = hits.clone();
    let handler_body = last_body.clone();
    let app = Router::new().route(
        "/predict",
        post(move |Json(request): Json<serde_json::Value>| {
            let hits = handler_hits.clone();
            let last = handler_body.clone();
            let body = body.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = Some(request);
                (status, Json(body))
            }
        }),
    );

    let url = spawn_server(app).await;
    PredictionStub {
        url: format!("{}/predict", url),
        hits,
        last_body,
    }
}

/// Run a router on 127.0.0.1 with an ephemeral port; returns its base URL.
#[allow(dead_code)]
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{}", addr)
}

/// Read a response body as UTF-8 text.
#[allow(dead_code)]
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
