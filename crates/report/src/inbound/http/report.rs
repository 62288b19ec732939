use app_core::extractors::{AppJson, AppQuery};
use app_core::jwt::Claims;
use app_core::response::{Meta, Response};
use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::inout::*;
use crate::inbound::model::report::*;
use crate::inbound::state::ReportState;

#[debug_handler]
pub async fn create_report(
    State(state): State<ReportState>,
    claims: Claims,
    AppJson(req): AppJson<CreateReportRequest>,
) -> impl IntoResponse {
    state
        .report
        .create_report(CreateReportInput { author_email: claims.sub, title: req.title, content: req.content })
        .await
        .map(ReportResponse::from)
        .map(Response::created)
}

#[debug_handler]
pub async fn list_my_reports(State(state): State<ReportState>, claims: Claims) -> impl IntoResponse {
    state
        .report
        .list_my_reports(ListMyReportsInput { author_email: claims.sub })
        .await
        .map(|reports| reports.into_iter().map(ReportResponse::from).collect::<Vec<_>>())
        .map(Response::from)
}

#[debug_handler]
pub async fn search_reports(
    State(state): State<ReportState>,
    AppQuery(req): AppQuery<SearchReportsRequest>,
) -> impl IntoResponse {
    let (page, per_page) = (req.page, req.per_page);

    state
        .report
        .search_reports(SearchReportsInput { keyword: req.keyword, page, per_page })
        .await
        .map(|output| {
            let reports = output.reports.into_iter().map(ReportResponse::from).collect::<Vec<_>>();
            Response::with_meta(reports, Meta::new(output.total, page, per_page))
        })
}
