// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims.
//!
//! The token payload is deliberately small: the authenticated identity and an
//! expiry instant. Anything else a protected upstream wants to know about a
//! user it must look up itself; the gateway only vouches for who the caller
//! is and until when.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Claim set carried inside every issued token.
///
/// `sub` holds the identity exactly as the credential verifier accepted it.
/// `exp` is a Unix timestamp in seconds. Validity is the half-open interval
/// from the issue instant up to (but excluding) `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated username.
    pub sub: String,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Build a claim set for `identity` expiring `validity` after `now`.
    ///
    /// `None` when the expiry instant falls outside the representable
    /// calendar range.
    pub fn new(
        identity: impl Into<String>,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Option<Self> {
        let expiry = now.checked_add_signed(validity)?;
        Some(Self {
            sub: identity.into(),
            exp: expiry.timestamp(),
        })
    }

    /// Whether the claim set is expired when observed at `now`.
    ///
    /// The boundary is strict: a token observed exactly at its `exp` instant
    /// is already expired.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
