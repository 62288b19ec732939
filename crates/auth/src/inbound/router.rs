use std::sync::Arc;

use app_core::jwt::TokenManager;
use app_core::middleware::{RoleGuard, auth, require_role};
use axum::routing::{delete, get, post};
use axum::{Router, middleware};

use crate::inbound::http::admin::*;
use crate::inbound::http::authn::*;
use crate::inbound::http::profile::*;
use crate::inbound::state::AuthState;

pub fn create_router(state: AuthState, tm: Arc<dyn TokenManager>) -> Router {
    let admin_routes = Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{user_id}", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(RoleGuard::admin(), require_role))
        .route_layer(middleware::from_fn_with_state(tm.clone(), auth));

    let protected_routes = Router::new()
        // profile scope
        .route("/me", get(get_profile).patch(update_profile))
        // authentication scope
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(tm, auth));

    let public_routes = Router::new()
        .route("/auth/social/{provider}/login", post(social_login))
        .route("/auth/social/{provider}", get(oauth_authorize))
        .route("/auth/social/{provider}/callback", get(oauth_callback))
        .route("/auth/refresh-token", post(refresh_token));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .with_state(state)
}
