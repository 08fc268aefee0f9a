// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoints: browser form flow and programmatic API flow.
//!
//! Both flows run the same credential check and token issue path; they only
//! differ in transport. The form flow answers with an `access_token` cookie
//! plus a redirect, the API flow with a JSON token the caller manages
//! itself. Rejections are deliberately uniform ("Invalid credentials") so
//! the response never reveals whether the username exists.

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::auth::IssueError;
use crate::credentials::verify_bounded;
use crate::error::ApiError;
use crate::state::AppState;

use super::ACCESS_TOKEN_COOKIE;

/// Where the browser lands after a successful form login. The prefixed path
/// resolves both with and without the reverse proxy stripping `/auth`.
const SUCCESS_REDIRECT: &str = "/auth/success";

const SUCCESS_PAGE: &str =
    "<h3>Login successful. You can now access /grafana/ and /prometheus/ via Nginx.</h3>";

/// Username/password pair, accepted as form fields or query parameters.
///
/// Missing fields become empty strings and fail verification, instead of
/// failing extraction with a 422.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoginParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful programmatic login.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed token; the same value the form flow stores in the cookie.
    pub token: String,
}

/// Serve the login page.
#[utoipa::path(
    get,
    path = "/",
    tag = "Login",
    responses((status = 200, description = "Login form", content_type = "text/html"))
)]
pub async fn index() -> Html<String> {
    Html(render_login_page(None))
}

/// Handle a form login and move the token into the session cookie.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Login",
    request_body(content = LoginParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Credentials accepted; cookie set, redirect to the success page"),
        (status = 200, description = "Credentials rejected; login page re-rendered with a generic error")
    )
)]
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(params): Form<LoginParams>,
) -> Response {
    match authenticate_and_issue(&state, &params.username, &params.password).await {
        Ok(Some(token)) => {
            let jar = jar.add(token_cookie(token, &state.cookie_path));
            (jar, Redirect::to(SUCCESS_REDIRECT)).into_response()
        }
        Ok(None) => Html(render_login_page(Some("Invalid credentials"))).into_response(),
        Err(e) => {
            error!(error = %e, "token signing failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Static post-login confirmation page.
#[utoipa::path(
    get,
    path = "/success",
    tag = "Login",
    responses((status = 200, description = "Post-login confirmation", content_type = "text/html"))
)]
pub async fn success() -> Html<&'static str> {
    Html(SUCCESS_PAGE)
}

/// Handle a programmatic login and return the token as JSON.
#[utoipa::path(
    get,
    path = "/api/login",
    tag = "Login",
    params(LoginParams),
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 401, description = "Credentials rejected")
    )
)]
pub async fn login_api(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = authenticate_and_issue(&state, &params.username, &params.password)
        .await
        .map_err(|e| {
            error!(error = %e, "token signing failed");
            ApiError::internal("token signing failed")
        })?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    Ok(Json(TokenResponse { token }))
}

/// Run the bounded credential check and mint a token on acceptance.
///
/// `Ok(None)` is a rejection. Verifier faults (timeout, backend error) also
/// land here as `None`; callers show one generic message either way.
async fn authenticate_and_issue(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Option<String>, IssueError> {
    let accepted = verify_bounded(
        state.verifier.as_ref(),
        state.verifier_timeout,
        username,
        password,
    )
    .await;

    if !accepted {
        warn!(username, "login rejected");
        return Ok(None);
    }

    let token = state.issuer.issue(username)?;
    info!(username, "login accepted, token issued");
    Ok(Some(token))
}

/// Build the session cookie carrying the token.
///
/// HttpOnly keeps scripts away from the token. No Max-Age is set; expiry
/// lives inside the token itself.
fn token_cookie(token: String, path: &str) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(path.to_owned())
        .build()
}

/// Render the login form, optionally with the generic rejection notice.
fn render_login_page(error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!("  <p style=\"color:red;\">{message}</p>\n"),
        None => String::new(),
    };
    format!(
        r#"<!doctype html>
<html>
<head><title>Login</title></head>
<body>
  <h2>Login to Monitoring System</h2>
  <form method="post" action="/auth/login">
    <label>Username: <input type="text" name="username" /></label><br/>
    <label>Password: <input type="password" name="password" /></label><br/>
    <button type="submit">Login</button>
  </form>
{error_html}</body>
</html>
"#
    )
}
