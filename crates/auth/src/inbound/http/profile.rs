use app_core::extractors::AppJson;
use app_core::jwt::Claims;
use app_core::response::Response;
use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::inout::prelude::*;
use crate::inbound::model::prelude::*;
use crate::inbound::state::AuthState;

#[debug_handler]
pub async fn get_profile(State(state): State<AuthState>, claims: Claims) -> impl IntoResponse {
    state
        .profile
        .get_profile(GetProfileInput { email: claims.sub })
        .await
        .map(UserResponse::from)
        .map(Response::from)
}

#[debug_handler]
pub async fn update_profile(
    State(state): State<AuthState>,
    claims: Claims,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> impl IntoResponse {
    state
        .profile
        .update_profile(UpdateProfileInput { email: claims.sub, nickname: req.nickname })
        .await
        .map(UserResponse::from)
        .map(|user| Response::with_message(user, "Profile updated"))
}
