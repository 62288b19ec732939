use app_core::extractors::{AppPath, AppQuery};
use app_core::response::{Meta, Response};
use axum::debug_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::inout::prelude::*;
use crate::inbound::model::prelude::*;
use crate::inbound::state::AuthState;

#[debug_handler]
pub async fn list_users(State(state): State<AuthState>, AppQuery(req): AppQuery<ListUsersRequest>) -> impl IntoResponse {
    let (page, per_page) = (req.page, req.per_page);

    state
        .admin
        .list_users(ListUsersInput { page, per_page, email: req.email, nickname: req.nickname })
        .await
        .map(|output| {
            let users = output.users.into_iter().map(UserResponse::from).collect::<Vec<_>>();
            Response::with_meta(users, Meta::new(output.total, page, per_page))
        })
}

#[debug_handler]
pub async fn delete_user(State(state): State<AuthState>, AppPath(user_id): AppPath<i64>) -> impl IntoResponse {
    state
        .admin
        .delete_user(DeleteUserInput { user_id })
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
