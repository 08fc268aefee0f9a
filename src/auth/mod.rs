// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Core
//!
//! Stateless token machinery for the gateway. There is no session store:
//! everything the gateway needs to answer "is this request allowed" is
//! inside the presented token itself.
//!
//! ## Token Flow
//!
//! 1. Login handler authenticates a username/password pair through the
//!    credential verifier
//! 2. [`TokenIssuer`] signs a compact HS256 token carrying `sub` and `exp`
//! 3. The client returns the token on later requests (cookie)
//! 4. [`TokenValidator`] checks the signature and expiry and reports a
//!    [`ValidationOutcome`] the decision endpoint maps onto allow/deny
//!
//! ## Security
//!
//! - One symmetric secret for the whole process, loaded at startup
//! - The validator pins HS256; the header's algorithm claim is verified,
//!   never trusted
//! - Expiry checks use zero leeway against the caller's clock
//! - Invalid input of any shape maps to a deny outcome, never a panic

pub mod claims;
pub mod keys;
pub mod token;

pub use claims::Claims;
pub use keys::SecretMaterial;
pub use token::{IssueError, TokenIssuer, TokenValidator, ValidationOutcome};
