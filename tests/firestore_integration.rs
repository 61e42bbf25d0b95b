// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it; otherwise they are skipped.

use credit_risk_portal::models::{RiskLabel, SubmissionForm, SubmissionRecord};

mod common;
use common::test_db;

fn unique_name() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("applicant-{}", nanos)
}

#[tokio::test]
async fn test_submission_is_appended() {
    require_emulator!();

    let db = test_db().await;
    let name = unique_name();

    let form = SubmissionForm {
        name: name.clone(),
        email: "test@example.com".to_string(),
        age: "41".to_string(),
        saving_account: "moderate".to_string(),
        checking_account: "rich".to_string(),
        credit_amount: "2500".to_string(),
        duration: "18".to_string(),
    };
    let record = SubmissionRecord::new(&form, RiskLabel::LowRisk, "emulator-user");

    db.insert_submission(&record).await.unwrap();

    let stored = db.list_submissions(50).await.unwrap();
    let found = stored
        .iter()
        .find(|r| r.name == name)
        .expect("record should be listed");

    assert_eq!(found.prediction, RiskLabel::LowRisk);
    assert_eq!(found.checking_account, "rich");
    assert_eq!(found.submitted_by, "emulator-user");
    assert_eq!(found.timestamp.timestamp(), record.timestamp.timestamp());
}

#[tokio::test]
async fn test_same_submission_twice_makes_two_records() {
    require_emulator!();

    let db = test_db().await;
    let name = unique_name();
    let form = SubmissionForm {
        name: name.clone(),
        ..SubmissionForm::default()
    };
    let record = SubmissionRecord::new(&form, RiskLabel::HighRisk, "emulator-user");

    db.insert_submission(&record).await.unwrap();
    db.insert_submission(&record).await.unwrap();

    let stored = db.list_submissions(100).await.unwrap();
    assert_eq!(stored.iter().filter(|r| r.name == name).count(), 2);
}
