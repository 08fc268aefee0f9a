// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing and verification key material.
//!
//! ## Security
//!
//! - One symmetric secret, loaded from configuration at startup and fixed
//!   for the process lifetime. Rotating it means restarting the gateway,
//!   which invalidates every outstanding token.
//! - `Debug` output never contains key bytes.
//!
//! ## Usage
//!
//! Build one `SecretMaterial` in `main` and share it via `Arc` between the
//! token issuer and the token validator.

use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Process-wide HMAC key pair derived from the configured gateway secret.
///
/// `jsonwebtoken` wants separate encoding and decoding handles even for a
/// symmetric algorithm, so both are derived here from the same bytes.
pub struct SecretMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SecretMaterial {
    /// Derive signing and verification keys from raw secret bytes.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key bytes must never reach logs.
        f.debug_struct("SecretMaterial").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_secret() {
        let material = SecretMaterial::from_secret(b"very-secret-bytes");
        let rendered = format!("{material:?}");
        assert!(!rendered.contains("very-secret-bytes"));
        assert!(rendered.contains("SecretMaterial"));
    }
}
