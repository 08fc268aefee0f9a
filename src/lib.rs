// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth Gateway - Stateless Signed-Token Authentication Service
//!
//! This crate provides a login service that issues HMAC-signed session
//! tokens and a decision endpoint that a reverse proxy consults per
//! request, plus a standalone Postgres load generator for exercising the
//! monitoring stack.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuing and validation (HS256)
//! - `credentials` - Credential verification backends
//! - `loader` - Synthetic database load generator

pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod loader;
pub mod state;
