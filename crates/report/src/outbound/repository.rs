use app_core::error::AppError;
use async_trait::async_trait;

use crate::domain::entity::{Author, NewReport, Report};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ReportRepository: Send + Sync {
    async fn find_author_by_email(&self, email: &str) -> Result<Option<Author>, AppError>;

    async fn create_report(&self, author: Author, new_report: NewReport) -> Result<Report, AppError>;

    /// All reports by one author, newest first.
    async fn find_reports_by_author(&self, author: Author) -> Result<Vec<Report>, AppError>;

    /// Reports whose author nickname or title starts with `keyword`, newest
    /// first. `page` is zero-based.
    async fn search_reports(&self, keyword: &str, page: u64, per_page: u64) -> Result<(Vec<Report>, u64), AppError>;
}
