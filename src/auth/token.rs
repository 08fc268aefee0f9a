// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issue and validation.
//!
//! ## Design
//!
//! The issuer and validator are two small structs sharing one
//! [`SecretMaterial`]. Issuing signs a [`Claims`] set with HS256; validation
//! reverses that and reports exactly one of four mutually exclusive outcomes
//! instead of raising errors:
//!
//! - `Valid(identity)` - signature verifies and the token is not expired
//! - `Expired` - signature verifies but the expiry instant has passed
//! - `SignatureInvalid` - the signature does not verify under the current
//!   secret, or the header names an algorithm other than HS256
//! - `Malformed` - the input is not a structurally valid token at all
//!
//! Callers deny on anything but `Valid` and may log which of the deny
//! outcomes occurred.
//!
//! ## Clocks
//!
//! Both structs take the observation instant as a parameter (`issue_at`,
//! `validate_at`) with `Utc::now()` convenience wrappers. Expiry is compared
//! here with zero leeway, so the one-hour boundary is exact; the
//! `jsonwebtoken` built-in expiry check is disabled because it reads the
//! wall clock and tolerates 60 seconds of skew.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use super::claims::Claims;
use super::keys::SecretMaterial;

/// Result of checking one presented token.
///
/// The variants are mutually exclusive and exhaustive. Only `Valid` carries
/// data: the identity the token vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Signature verifies and the token has not expired.
    Valid(String),
    /// Signature verifies but the expiry instant has passed.
    Expired,
    /// Signature mismatch, or the header names a different algorithm.
    SignatureInvalid,
    /// Not a structurally valid token (bad segments, base64, or claims).
    Malformed,
}

/// Token signing failure.
///
/// With symmetric key material loaded at startup and a bounded validity
/// neither variant is reachable per request; the type exists so the handler
/// path stays panic-free.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("token signing failed: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),

    #[error("token expiry falls outside the representable time range")]
    ExpiryOutOfRange,
}

/// Issues signed, expiring tokens for authenticated identities.
pub struct TokenIssuer {
    keys: Arc<SecretMaterial>,
    validity: Duration,
}

impl TokenIssuer {
    /// Create an issuer producing tokens valid for `validity` after issue.
    pub fn new(keys: Arc<SecretMaterial>, validity: Duration) -> Self {
        Self { keys, validity }
    }

    /// Issue a token for `identity` expiring `validity` from now.
    pub fn issue(&self, identity: &str) -> Result<String, IssueError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as observed from an explicit instant.
    pub fn issue_at(&self, identity: &str, now: DateTime<Utc>) -> Result<String, IssueError> {
        let claims =
            Claims::new(identity, now, self.validity).ok_or(IssueError::ExpiryOutOfRange)?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())?;
        Ok(token)
    }
}

/// Validates presented tokens against the gateway secret.
pub struct TokenValidator {
    keys: Arc<SecretMaterial>,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(keys: Arc<SecretMaterial>) -> Self {
        // Pinning HS256 here means the algorithm from the token header is
        // checked against our expectation, not trusted as presented.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self { keys, validation }
    }

    /// Validate `token` against the wall clock.
    pub fn validate(&self, token: &str) -> ValidationOutcome {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as observed from an explicit instant.
    ///
    /// Never panics; every decode fault maps onto one of the deny outcomes.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> ValidationOutcome {
        let data = match decode::<Claims>(token, self.keys.decoding(), &self.validation) {
            Ok(data) => data,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        ValidationOutcome::SignatureInvalid
                    }
                    _ => ValidationOutcome::Malformed,
                }
            }
        };

        if data.claims.expired_at(now) {
            return ValidationOutcome::Expired;
        }

        ValidationOutcome::Valid(data.claims.sub)
    }
}
