// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod google_auth;
pub mod google_oidc;
pub mod prediction;
pub mod submission;

pub use google_auth::GoogleAuthClient;
pub use google_oidc::{GoogleOidcVerifier, OidcError, VerifiedIdentity};
pub use prediction::{Prediction, PredictionClient};
pub use submission::SubmissionProcessor;
