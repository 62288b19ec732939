use std::sync::Arc;

use app_core::jwt::TokenManager;
use app_core::middleware::{RoleGuard, auth, require_role};
use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::inbound::http::report::*;
use crate::inbound::state::ReportState;

pub fn create_router(state: ReportState, tm: Arc<dyn TokenManager>) -> Router {
    let admin_routes = Router::new()
        .route("/admin/reports", get(search_reports))
        .route_layer(middleware::from_fn_with_state(RoleGuard::admin(), require_role))
        .route_layer(middleware::from_fn_with_state(tm.clone(), auth));

    let protected_routes = Router::new()
        .route("/reports", post(create_report))
        .route("/reports/me", get(list_my_reports))
        .route_layer(middleware::from_fn_with_state(tm, auth));

    Router::new().merge(protected_routes).merge(admin_routes).with_state(state)
}
