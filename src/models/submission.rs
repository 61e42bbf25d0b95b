// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Applicant submission model for the form, the API and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::AppError;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Saving account tiers offered by the form, in display order.
pub const SAVING_ACCOUNT_OPTIONS: [&str; 5] = ["NaN", "little", "moderate", "quite rich", "rich"];

/// Checking account tiers offered by the form, in display order.
pub const CHECKING_ACCOUNT_OPTIONS: [&str; 5] = ["NaN", "none", "little", "moderate", "rich"];

/// Applicant attributes as entered by the user.
///
/// Values are kept as the raw text from the form; only presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(deserialize_with = "string_or_number")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | number"))]
    pub age: String,
    #[validate(length(min = 1))]
    pub saving_account: String,
    #[validate(length(min = 1))]
    pub checking_account: String,
    #[validate(length(min = 1))]
    #[serde(deserialize_with = "string_or_number")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | number"))]
    pub credit_amount: String,
    /// Duration in months
    #[validate(length(min = 1))]
    #[serde(deserialize_with = "string_or_number")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | number"))]
    pub duration: String,
}

impl SubmissionForm {
    /// Ensure every field has a value.
    pub fn ensure_complete(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            tracing::debug!(errors = %errors, "Submission rejected: missing fields");
            AppError::Validation(AppError::MISSING_FIELDS.to_string())
        })
    }
}

/// Accept numeric fields as typed text or as JSON numbers; null reads as empty.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct TextOrNumber;

    impl serde::de::Visitor<'_> for TextOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextOrNumber)
}

/// Binary risk classification returned by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RiskLabel {
    #[serde(rename = "High Risk (Bad)")]
    HighRisk,
    #[serde(rename = "Low Risk (Good)")]
    LowRisk,
}

impl RiskLabel {
    /// Map a raw model output: 0 is high risk, anything else low risk.
    pub fn from_prediction(value: &serde_json::Number) -> Self {
        let is_zero = match value.as_f64() {
            Some(v) => v == 0.0,
            None => false,
        };

        if is_zero {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "High Risk (Bad)",
            RiskLabel::LowRisk => "Low Risk (Good)",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submission log entry stored in Firestore.
///
/// Append-only: written once with a generated document ID, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub age: String,
    pub saving_account: String,
    pub checking_account: String,
    pub credit_amount: String,
    pub duration: String,
    /// Risk label derived from the prediction
    pub prediction: RiskLabel,
    /// Identity provider subject of the signed-in user
    pub submitted_by: String,
    /// Assigned by the server at write time
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(form: &SubmissionForm, prediction: RiskLabel, submitted_by: &str) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            age: form.age.clone(),
            saving_account: form.saving_account.clone(),
            checking_account: form.checking_account.clone(),
            credit_amount: form.credit_amount.clone(),
            duration: form.duration.clone(),
            prediction,
            submitted_by: submitted_by.to_string(),
            timestamp: Utc::now(),
        }
    }
}
