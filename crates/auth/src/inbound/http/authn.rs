use app_core::error::AppError;
use app_core::extractors::{AppJson, AppPath, AppQuery};
use app_core::response::Response;
use axum::debug_handler;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use tower_cookies::cookie::{SameSite, time};
use tower_cookies::{Cookie, Cookies};

use crate::domain::inout::prelude::*;
use crate::inbound::model::prelude::*;
use crate::inbound::state::AuthState;

const COOKIE_OAUTH_STATE: &str = "__oauth_state";

#[debug_handler]
pub async fn social_login(
    State(state): State<AuthState>,
    AppPath(provider): AppPath<String>,
    AppJson(req): AppJson<SocialLoginRequest>,
) -> impl IntoResponse {
    state
        .authn
        .social_login(SocialLoginInput { provider, code: req.code })
        .await
        .map(|output| TokenPairResponse { access_token: output.access_token, refresh_token: output.refresh_token })
        .map(Response::from)
}

#[debug_handler]
pub async fn oauth_authorize(
    State(state): State<AuthState>,
    cookies: Cookies,
    AppPath(provider): AppPath<String>,
) -> impl IntoResponse {
    state.authn.social_authorize(SocialAuthorizeInput { provider }).await.map(|output| {
        let cookie = Cookie::build((COOKIE_OAUTH_STATE, output.csrf_token.secret().clone()))
            .http_only(true)
            .secure(true)
            .path("/")
            .max_age(time::Duration::minutes(3))
            .same_site(SameSite::Lax)
            .build();

        cookies.private(&state.cookie_key).add(cookie);

        Redirect::to(&output.auth_url)
    })
}

#[debug_handler]
pub async fn oauth_callback(
    State(state): State<AuthState>,
    cookies: Cookies,
    AppPath(provider): AppPath<String>,
    AppQuery(query): AppQuery<OAuthCallbackRequest>,
) -> impl IntoResponse {
    if let Some(err) = query.error {
        return Err(AppError::Forbidden(format!("OAuth authentication failed: {err}")));
    }

    let code = query
        .code
        .ok_or_else(|| AppError::Forbidden("Missing authorization code".to_string()))?;

    let stored_csrf_token = cookies
        .private(&state.cookie_key)
        .get(COOKIE_OAUTH_STATE)
        .ok_or_else(|| AppError::Forbidden("OAuth session expired or invalid".to_string()))?;

    cookies.private(&state.cookie_key).remove(Cookie::new(COOKIE_OAUTH_STATE, ""));

    if query.state != stored_csrf_token.value() {
        return Err(AppError::Forbidden("Invalid OAuth state token".to_string()));
    }

    let redirect_to = state.config.get::<String>("redirect_to").unwrap_or_default();

    state
        .authn
        .social_login(SocialLoginInput { provider, code })
        .await
        .map(|output| {
            Redirect::to(&format!(
                "{redirect_to}?state=oauth&access_token={}&refresh_token={}",
                output.access_token, output.refresh_token,
            ))
        })
}

#[debug_handler]
pub async fn refresh_token(
    State(state): State<AuthState>,
    AppJson(req): AppJson<RefreshTokenRequest>,
) -> impl IntoResponse {
    state
        .authn
        .refresh_token(RefreshTokenInput { refresh_token: req.refresh_token })
        .await
        .map(|output| TokenPairResponse { access_token: output.access_token, refresh_token: output.refresh_token })
        .map(Response::from)
}

#[debug_handler]
pub async fn logout(State(state): State<AuthState>, AppJson(req): AppJson<LogoutRequest>) -> impl IntoResponse {
    state
        .authn
        .logout(LogoutInput { refresh_token: req.refresh_token })
        .await
        .map(|output| LogoutResponse { success: output.success })
        .map(Response::from)
}
