use std::sync::Arc;

use app_core::error::AppError;
use app_core::uid::Generator;
use async_trait::async_trait;
use validator::Validate;

use crate::domain::entity::{Author, NewReport, Report};
use crate::domain::inout::*;
use crate::outbound::repository::ReportRepository;

const AUTHOR_NOT_FOUND_MSG: &str = "User not found";

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ReportUseCase: Send + Sync {
    async fn create_report(&self, input: CreateReportInput) -> Result<Report, AppError>;
    async fn list_my_reports(&self, input: ListMyReportsInput) -> Result<Vec<Report>, AppError>;
    async fn search_reports(&self, input: SearchReportsInput) -> Result<SearchReportsOutput, AppError>;
}

#[derive(Clone)]
pub struct ReportService {
    uid: Arc<dyn Generator>,
    repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(uid: Arc<dyn Generator>, repo: Arc<dyn ReportRepository>) -> Self {
        Self { uid, repo }
    }

    async fn get_author(&self, email: &str) -> Result<Author, AppError> {
        self.repo
            .find_author_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(AUTHOR_NOT_FOUND_MSG.to_string()))
    }
}

#[async_trait]
impl ReportUseCase for ReportService {
    async fn create_report(&self, mut input: CreateReportInput) -> Result<Report, AppError> {
        input.title = input.title.trim().to_string();
        input.validate()?;

        let author = self.get_author(&input.author_email).await?;
        let new_report = NewReport { id: self.uid.generate()?, title: input.title, content: input.content };

        let report = self.repo.create_report(author, new_report).await?;
        tracing::info!(report_id = report.id, user_id = report.author.id, "Report filed");

        Ok(report)
    }

    async fn list_my_reports(&self, input: ListMyReportsInput) -> Result<Vec<Report>, AppError> {
        input.validate()?;

        let author = self.get_author(&input.author_email).await?;

        self.repo.find_reports_by_author(author).await
    }

    async fn search_reports(&self, input: SearchReportsInput) -> Result<SearchReportsOutput, AppError> {
        input.validate()?;

        let keyword = input.keyword.as_deref().map(str::trim).unwrap_or_default();
        let (reports, total) = self.repo.search_reports(keyword, input.page - 1, input.per_page).await?;

        Ok(SearchReportsOutput { reports, total })
    }
}
