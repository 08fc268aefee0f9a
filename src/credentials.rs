// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification boundary.
//!
//! The gateway core makes no assumption about where usernames and passwords
//! live or how they are hashed; it only asks a [`CredentialVerifier`] for an
//! accept/reject answer at login time. The built-in [`StaticCredentials`]
//! implementation is seeded from configuration and is the only place a
//! password is ever compared.
//!
//! Verifier calls are the one potentially slow await in the login path, so
//! callers go through [`verify_bounded`], which imposes a timeout and treats
//! timeouts and backend errors as rejections. A broken credential backend
//! must never let anyone in.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tracing::error;

/// Failure inside a credential backend, distinct from a clean rejection.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("credential backend unavailable: {0}")]
    Unavailable(String),
}

/// External authority deciding whether a username/password pair names a
/// legitimate identity.
///
/// `Ok(false)` is a clean rejection; `Err` means the backend itself failed
/// and the caller decides what that implies (the gateway rejects).
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, VerifierError>;
}

/// Fixed username/password table loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            users: pairs.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, VerifierError> {
        let Some(expected) = self.users.get(username) else {
            return Ok(false);
        };

        // Constant-time comparison, no early exit on the first wrong byte.
        let accepted = password.len() == expected.len()
            && bool::from(password.as_bytes().ct_eq(expected.as_bytes()));
        Ok(accepted)
    }
}

/// Run a verifier with an upper time bound, failing closed.
///
/// Timeouts and backend errors are logged and reported as a rejection; the
/// caller cannot tell them apart from bad credentials, which is the point.
pub async fn verify_bounded(
    verifier: &dyn CredentialVerifier,
    limit: Duration,
    username: &str,
    password: &str,
) -> bool {
    match tokio::time::timeout(limit, verifier.verify(username, password)).await {
        Ok(Ok(accepted)) => accepted,
        Ok(Err(e)) => {
            error!(error = %e, "credential verifier failed, rejecting login");
            false
        }
        Err(_) => {
            error!(
                limit_secs = limit.as_secs(),
                "credential verifier timed out, rejecting login"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_table() -> StaticCredentials {
        StaticCredentials::new([("admin".to_string(), "admin".to_string())])
    }

    #[tokio::test]
    async fn accepts_the_seeded_pair() {
        let creds = admin_table();
        assert!(creds.verify("admin", "admin").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_user() {
        let creds = admin_table();
        assert!(!creds.verify("admin", "nimda").await.unwrap());
        assert!(!creds.verify("admin", "admin2").await.unwrap());
        assert!(!creds.verify("root", "admin").await.unwrap());
        assert!(!creds.verify("", "").await.unwrap());
    }

    struct SlowVerifier;

    #[async_trait]
    impl CredentialVerifier for SlowVerifier {
        async fn verify(&self, _username: &str, _password: &str) -> Result<bool, VerifierError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(true)
        }
    }

    struct BrokenVerifier;

    #[async_trait]
    impl CredentialVerifier for BrokenVerifier {
        async fn verify(&self, _username: &str, _password: &str) -> Result<bool, VerifierError> {
            Err(VerifierError::Unavailable("directory offline".to_string()))
        }
    }

    #[tokio::test]
    async fn bounded_verify_rejects_on_timeout() {
        let accepted = verify_bounded(
            &SlowVerifier,
            Duration::from_millis(20),
            "admin",
            "admin",
        )
        .await;
        assert!(!accepted);
    }

    #[tokio::test]
    async fn bounded_verify_rejects_on_backend_error() {
        let accepted = verify_bounded(
            &BrokenVerifier,
            Duration::from_secs(5),
            "admin",
            "admin",
        )
        .await;
        assert!(!accepted);
    }

    #[tokio::test]
    async fn bounded_verify_passes_through_accepts() {
        let accepted = verify_bounded(
            &admin_table(),
            Duration::from_secs(5),
            "admin",
            "admin",
        )
        .await;
        assert!(accepted);
    }
}
