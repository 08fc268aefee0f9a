// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.
//!
//! Everything in here is immutable after startup and cheap to clone, so
//! request handlers never contend on a lock. The issuer and validator share
//! one [`SecretMaterial`] derived from the configured secret.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{SecretMaterial, TokenIssuer, TokenValidator};
use crate::config::Config;
use crate::credentials::{CredentialVerifier, StaticCredentials};

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub cookie_path: String,
    pub verifier_timeout: Duration,
}

impl AppState {
    /// Wire up issuer, validator and the built-in credential table from
    /// resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        let keys = Arc::new(SecretMaterial::from_secret(config.secret.as_bytes()));
        Self {
            issuer: Arc::new(TokenIssuer::new(keys.clone(), config.token_ttl)),
            validator: Arc::new(TokenValidator::new(keys)),
            verifier: Arc::new(StaticCredentials::new(config.users.iter().cloned())),
            cookie_path: config.cookie_path.clone(),
            verifier_timeout: config.verifier_timeout,
        }
    }

    /// Swap the credential verifier, keeping everything else.
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}
