// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper for the submission log.
//!
//! The log is append-only: records are inserted with generated document IDs
//! and never read back by the request path.

use crate::error::AppError;
use crate::models::SubmissionRecord;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    /// Records kept in process memory (tests and local demos).
    Memory(Arc<Mutex<Vec<SubmissionRecord>>>),
    /// No backing store; every operation fails.
    Offline,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
    collection: String,
}

impl FirestoreDb {
    /// Create a new Firestore client writing to `collection`.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, collection: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, collection).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, collection, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
            collection: collection.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            collection,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
            collection: collection.to_string(),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
            collection: crate::config::DEFAULT_SUBMISSIONS_COLLECTION.to_string(),
        }
    }

    /// Create an in-memory store that records inserted submissions.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(Vec::new()))),
            collection: crate::config::DEFAULT_SUBMISSIONS_COLLECTION.to_string(),
        }
    }

    // ─── Submission Operations ───────────────────────────────────

    /// Append a submission record with a generated document ID.
    pub async fn insert_submission(&self, record: &SubmissionRecord) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: SubmissionRecord = client
                    .fluent()
                    .insert()
                    .into(self.collection.as_str())
                    .generate_document_id()
                    .object(record)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            Backend::Memory(records) => {
                records
                    .lock()
                    .map_err(|_| AppError::Database("In-memory store poisoned".to_string()))?
                    .push(record.clone());
            }
            Backend::Offline => {
                return Err(AppError::Database(
                    "Database not connected (offline mode)".to_string(),
                ));
            }
        }

        tracing::debug!(collection = %self.collection, "Submission record stored");
        Ok(())
    }

    /// Records held by the in-memory backend, in insertion order.
    ///
    /// Empty for the Firestore and offline backends.
    pub fn recorded_submissions(&self) -> Vec<SubmissionRecord> {
        match &self.backend {
            Backend::Memory(records) => records
                .lock()
                .map(|records| records.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// List stored submissions, newest first.
    ///
    /// Used by integration tests against the emulator; the web flow never reads.
    pub async fn list_submissions(&self, limit: u32) -> Result<Vec<SubmissionRecord>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .from(self.collection.as_str())
                .order_by([("timestamp", firestore::FirestoreQueryDirection::Descending)])
                .limit(limit)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(_) => {
                let mut records = self.recorded_submissions();
                records.reverse();
                records.truncate(limit as usize);
                Ok(records)
            }
            Backend::Offline => Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            )),
        }
    }
}
