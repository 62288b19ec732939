use std::sync::Arc;

use app_core::error::AppError;
use app_orm::prelude::{Reports, Users};
use app_orm::{reports, users};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use super::repository::ReportRepository;
use crate::domain::entity::{Author, NewReport, Report};

pub struct ReportORM {
    db: Arc<DatabaseConnection>,
}

impl ReportORM {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_report(model: reports::Model, author: Author) -> Report {
        Report {
            id: model.id,
            author,
            title: model.title,
            content: model.content,
            created_at: model.created_at.into(),
        }
    }
}

#[async_trait]
impl ReportRepository for ReportORM {
    async fn find_author_by_email(&self, email: &str) -> Result<Option<Author>, AppError> {
        let model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(|m| Author { id: m.id, nickname: m.nickname }))
    }

    async fn create_report(&self, author: Author, new_report: NewReport) -> Result<Report, AppError> {
        let model = reports::ActiveModel {
            id: ActiveValue::Set(new_report.id),
            user_id: ActiveValue::Set(author.id),
            title: ActiveValue::Set(new_report.title),
            content: ActiveValue::Set(new_report.content),
            created_at: ActiveValue::Set(Utc::now().fixed_offset()),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(Self::to_report(model, author))
    }

    async fn find_reports_by_author(&self, author: Author) -> Result<Vec<Report>, AppError> {
        let models = Reports::find()
            .filter(reports::Column::UserId.eq(author.id))
            .order_by_desc(reports::Column::CreatedAt)
            .order_by_desc(reports::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(|m| Self::to_report(m, author.clone())).collect())
    }

    async fn search_reports(&self, keyword: &str, page: u64, per_page: u64) -> Result<(Vec<Report>, u64), AppError> {
        let mut query = Reports::find().find_also_related(Users);

        if !keyword.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(users::Column::Nickname.starts_with(keyword))
                    .add(reports::Column::Title.starts_with(keyword)),
            );
        }

        let paginator = query
            .order_by_desc(reports::Column::CreatedAt)
            .order_by_desc(reports::Column::Id)
            .paginate(self.db.as_ref(), per_page);
        let total_items = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;

        let reports = rows
            .into_iter()
            .map(|(report, user)| {
                let user = user.ok_or_else(|| {
                    tracing::error!(report_id = report.id, user_id = report.user_id, "Report without author");
                    AppError::Internal
                })?;
                Ok(Self::to_report(report, Author { id: user.id, nickname: user.nickname }))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok((reports, total_items))
    }
}
