// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod submission;

pub use submission::{
    RiskLabel, SubmissionForm, SubmissionRecord, CHECKING_ACCOUNT_OPTIONS,
    SAVING_ACCOUNT_OPTIONS,
};
