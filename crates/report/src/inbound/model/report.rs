use serde::{Deserialize, Serialize};

use crate::domain::entity::Report;

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub author_id: i64,
    pub author_nickname: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            author_id: report.author.id,
            author_nickname: report.author.nickname,
            title: report.title,
            content: report.content,
            created_at: report.created_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub content: String,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

#[derive(Deserialize)]
pub struct SearchReportsRequest {
    pub keyword: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}
