// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface of the gateway.
//!
//! Every route is registered twice, bare and under `/auth`, because the
//! reverse proxy in front may or may not strip the prefix depending on how
//! its location block is written. The decision endpoint is additionally hit
//! once per protected request as an internal subrequest, so it stays free
//! of I/O.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod health;
pub mod login;
pub mod verify;

/// Name of the cookie transporting the token between client and gateway.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(login::index))
        .route("/login", post(login::login_form))
        .route("/success", get(login::success))
        .route("/api/login", get(login::login_api))
        .route("/verify", get(verify::verify))
        .route("/health", get(health::health))
        .with_state(state);

    Router::new()
        .merge(routes.clone())
        .nest("/auth", routes)
        // Nesting exposes the inner root at `/auth` without the trailing
        // slash; the slash form the proxy produces is routed explicitly.
        .route("/auth/", get(login::index))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::index,
        login::login_form,
        login::success,
        login::login_api,
        verify::verify,
        health::health
    ),
    components(schemas(login::TokenResponse, health::HealthResponse)),
    tags(
        (name = "Login", description = "Interactive and programmatic login"),
        (name = "Verify", description = "Authorization subrequests from the reverse proxy"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;
