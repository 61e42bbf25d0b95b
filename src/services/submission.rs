// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Submission processing service.
//!
//! Handles the core workflow:
//! 1. Check that every field is present
//! 2. Request a prediction from the model service
//! 3. Append the submission record to Firestore

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{SubmissionForm, SubmissionRecord};
use crate::services::prediction::{Prediction, PredictionClient};

/// Runs a submission through validation, prediction and logging.
#[derive(Clone)]
pub struct SubmissionProcessor {
    prediction: PredictionClient,
    db: FirestoreDb,
}

impl SubmissionProcessor {
    pub fn new(prediction: PredictionClient, db: FirestoreDb) -> Self {
        Self { prediction, db }
    }

    /// Process one submission for the signed-in `subject`.
    ///
    /// The record is written only after a successful prediction. A failed
    /// write fails the whole submission.
    pub async fn submit(&self, form: &SubmissionForm, subject: &str) -> Result<Prediction> {
        form.ensure_complete()?;

        let prediction = self.prediction.predict(form).await?;

        let record = SubmissionRecord::new(form, prediction.label, subject);
        self.db.insert_submission(&record).await.map_err(|e| {
            tracing::error!(error = %e, subject, "Failed to store submission record");
            e
        })?;

        tracing::info!(subject, label = %prediction.label, "Submission processed");

        Ok(prediction)
    }
}
