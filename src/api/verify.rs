// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decision endpoint for the reverse proxy.
//!
//! Nginx `auth_request` fires one subrequest here per protected hit and
//! honors only the status code: 2xx allows, 401 denies. The plain-text
//! bodies exist for humans reading curl output; nothing upstream consumes
//! them, and they never carry token internals or secrets. The deny reason
//! is still logged, so tampering attempts are distinguishable from expired
//! sessions in the gateway's own logs.

use axum::{extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, warn};

use crate::auth::ValidationOutcome;
use crate::state::AppState;

use super::ACCESS_TOKEN_COOKIE;

/// Answer the allow/deny subrequest from the token cookie alone.
#[utoipa::path(
    get,
    path = "/verify",
    tag = "Verify",
    responses(
        (status = 200, description = "Token valid; request allowed"),
        (status = 401, description = "Token missing, expired, or invalid")
    )
)]
pub async fn verify(State(state): State<AppState>, jar: CookieJar) -> (StatusCode, &'static str) {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .unwrap_or_default();

    // An empty cookie value counts as no token at all.
    if token.is_empty() {
        debug!("verify denied: no token presented");
        return (StatusCode::UNAUTHORIZED, "No token");
    }

    match state.validator.validate(token) {
        ValidationOutcome::Valid(identity) => {
            debug!(identity = %identity, "verify allowed");
            (StatusCode::OK, "OK")
        }
        ValidationOutcome::Expired => {
            info!("verify denied: token expired");
            (StatusCode::UNAUTHORIZED, "Token expired")
        }
        ValidationOutcome::SignatureInvalid => {
            warn!("verify denied: signature invalid");
            (StatusCode::UNAUTHORIZED, "Invalid token")
        }
        ValidationOutcome::Malformed => {
            warn!("verify denied: malformed token");
            (StatusCode::UNAUTHORIZED, "Invalid token")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum_extra::extract::cookie::Cookie;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::from_config(&Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            secret: "verify-test-secret".to_string(),
            token_ttl: ChronoDuration::hours(1),
            cookie_path: "/".to_string(),
            users: vec![("admin".to_string(), "admin".to_string())],
            verifier_timeout: Duration::from_secs(5),
        })
    }

    fn jar_with_token(token: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, token.to_string()))
    }

    #[tokio::test]
    async fn allows_a_fresh_token() {
        let state = test_state();
        let token = state.issuer.issue("admin").unwrap();

        let (status, body) = verify(State(state), jar_with_token(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn denies_without_a_cookie() {
        let (status, body) = verify(State(test_state()), CookieJar::new()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "No token");
    }

    #[tokio::test]
    async fn denies_an_empty_cookie_value() {
        let (status, body) = verify(State(test_state()), jar_with_token("")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "No token");
    }

    #[tokio::test]
    async fn denies_a_token_issued_over_an_hour_ago() {
        let state = test_state();
        let token = state
            .issuer
            .issue_at("admin", Utc::now() - ChronoDuration::minutes(61))
            .unwrap();

        let (status, body) = verify(State(state), jar_with_token(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Token expired");
    }

    #[tokio::test]
    async fn denies_a_tampered_token() {
        let state = test_state();
        let token = state.issuer.issue("admin").unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut tampered = token.clone().into_bytes();
        tampered[sig_start] = if tampered[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        let (status, body) = verify(State(state), jar_with_token(&tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Invalid token");
    }

    #[tokio::test]
    async fn denies_garbage_tokens() {
        let (status, body) = verify(State(test_state()), jar_with_token("not-a-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Invalid token");
    }
}
