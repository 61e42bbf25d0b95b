// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the external credit-risk prediction service.
//!
//! One POST per submission: `{ "data": { ...features } }` in,
//! `{ "predictions": [n, ...] }` out. No retry, no timeout.

use crate::error::AppError;
use crate::models::{RiskLabel, SubmissionForm};
use serde::{Deserialize, Serialize};

/// Feature payload in the column names the model was trained on.
#[derive(Debug, Serialize)]
pub struct PredictionFeatures<'a> {
    #[serde(rename = "Age")]
    pub age: &'a str,
    #[serde(rename = "Saving accounts")]
    pub saving_accounts: &'a str,
    #[serde(rename = "Checking account")]
    pub checking_account: &'a str,
    #[serde(rename = "Credit amount")]
    pub credit_amount: &'a str,
    #[serde(rename = "Duration")]
    pub duration: &'a str,
}

impl<'a> From<&'a SubmissionForm> for PredictionFeatures<'a> {
    fn from(form: &'a SubmissionForm) -> Self {
        Self {
            age: &form.age,
            saving_accounts: &form.saving_account,
            checking_account: &form.checking_account,
            credit_amount: &form.credit_amount,
            duration: &form.duration,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    data: PredictionFeatures<'a>,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    predictions: Vec<serde_json::Number>,
}

/// Outcome of a single prediction call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// First raw value returned by the model
    pub value: serde_json::Number,
    pub label: RiskLabel,
}

/// Prediction service client.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a risk prediction for a submission.
    pub async fn predict(&self, form: &SubmissionForm) -> Result<Prediction, AppError> {
        let body = PredictionRequest {
            data: PredictionFeatures::from(form),
        };

        tracing::debug!(endpoint = %self.endpoint, "Requesting risk prediction");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PredictionService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Prediction service error");
            return Err(AppError::PredictionService(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let parsed: PredictionResponse = response
            .json()
            .await
            .map_err(|e| AppError::PredictionService(format!("Invalid response: {}", e)))?;

        let value = parsed.predictions.into_iter().next().ok_or_else(|| {
            AppError::PredictionService("Prediction service returned no predictions".to_string())
        })?;

        let label = RiskLabel::from_prediction(&value);
        tracing::info!(value = %value, label = %label, "Prediction received");

        Ok(Prediction { value, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_model_column_names() {
        let form = SubmissionForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: "36".to_string(),
            saving_account: "quite rich".to_string(),
            checking_account: "none".to_string(),
            credit_amount: "1200".to_string(),
            duration: "24".to_string(),
        };

        let body = serde_json::to_value(PredictionRequest {
            data: PredictionFeatures::from(&form),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "data": {
                    "Age": "36",
                    "Saving accounts": "quite rich",
                    "Checking account": "none",
                    "Credit amount": "1200",
                    "Duration": "24"
                }
            })
        );
    }

    #[test]
    fn response_accepts_integer_and_float_predictions() {
        let parsed: PredictionResponse =
            serde_json::from_str(r#"{"predictions":[0, 1.0]}"#).unwrap();
        assert_eq!(parsed.predictions.len(), 2);
        assert_eq!(RiskLabel::from_prediction(&parsed.predictions[0]), RiskLabel::HighRisk);
        assert_eq!(RiskLabel::from_prediction(&parsed.predictions[1]), RiskLabel::LowRisk);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_prediction_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = PredictionClient::new("http://127.0.0.1:9/predict");
        let err = client.predict(&SubmissionForm::default()).await.unwrap_err();
        assert!(matches!(err, AppError::PredictionService(_)));
    }
}
