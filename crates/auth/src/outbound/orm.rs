use std::sync::Arc;

use app_core::error::AppError;
use app_core::jwt::Role;
use app_orm::prelude::Users;
use app_orm::users;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use super::repository::UserRepository;
use crate::domain::entity::user::{NewUser, SocialType, User, UserFilter, UserUpdatePayload};

const EMAIL_TAKEN_MSG: &str = "A user with this email already exists";
const SOCIAL_ACCOUNT_TAKEN_MSG: &str = "This social account is already registered";

const SOCIAL_UNIQUE_CONSTRAINT: &str = "users_social_key";

/// `UserORM` is the sea-orm backed [`UserRepository`].
///
/// It maps `users::Model` rows onto the domain [`User`] and translates unique
/// index violations into [`AppError::Conflict`].
pub struct UserORM {
    db: Arc<DatabaseConnection>,
}

impl UserORM {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Converts a `users::Model` into a `User` domain entity.
    fn to_user(&self, model: users::Model) -> Result<User, AppError> {
        let social_type = SocialType::from_i16(model.social_type).ok_or_else(|| {
            tracing::error!(user_id = model.id, "Unknown social_type {} stored for user", model.social_type);
            AppError::Internal
        })?;
        let role = Role::from_i16(model.role).ok_or_else(|| {
            tracing::error!(user_id = model.id, "Unknown role {} stored for user", model.role);
            AppError::Internal
        })?;

        Ok(User {
            id: model.id,
            social_id: model.social_id,
            social_type,
            email: model.email,
            nickname: model.nickname,
            image_url: model.image_url,
            role,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    fn map_write_error(err: DbErr) -> AppError {
        Self::classify_write_error(err.sql_err(), err)
    }

    /// Unique violations become [`AppError::Conflict`], told apart by the
    /// constraint name Postgres puts in the message.
    fn classify_write_error(sql_err: Option<SqlErr>, err: DbErr) -> AppError {
        match sql_err {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!("Rejected duplicate user write: {}", detail);
                if detail.contains(SOCIAL_UNIQUE_CONSTRAINT) {
                    AppError::Conflict(SOCIAL_ACCOUNT_TAKEN_MSG.to_string())
                } else {
                    AppError::Conflict(EMAIL_TAKEN_MSG.to_string())
                }
            },
            _ => AppError::Database(err),
        }
    }
}

#[async_trait]
impl UserRepository for UserORM {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let model = Users::find_by_id(id).one(self.db.as_ref()).await?;

        model.map(|m| self.to_user(m)).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;

        model.map(|m| self.to_user(m)).transpose()
    }

    async fn find_user_by_social(&self, social_type: SocialType, social_id: &str) -> Result<Option<User>, AppError> {
        let model = Users::find()
            .filter(users::Column::SocialType.eq(social_type as i16))
            .filter(users::Column::SocialId.eq(social_id))
            .one(self.db.as_ref())
            .await?;

        model.map(|m| self.to_user(m)).transpose()
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            id: ActiveValue::Set(new_user.id),
            social_id: ActiveValue::Set(new_user.social_id),
            social_type: ActiveValue::Set(new_user.social_type as i16),
            email: ActiveValue::Set(new_user.email),
            nickname: ActiveValue::Set(new_user.nickname),
            image_url: ActiveValue::Set(new_user.image_url),
            role: ActiveValue::Set(new_user.role as i16),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(Self::map_write_error)?;

        self.to_user(model)
    }

    async fn find_users(&self, filter: UserFilter, page: u64, per_page: u64) -> Result<(Vec<User>, u64), AppError> {
        let mut query = Users::find();

        if let Some(email) = filter.email.as_deref().filter(|e| !e.is_empty()) {
            query = query.filter(users::Column::Email.starts_with(email));
        }
        if let Some(nickname) = filter.nickname.as_deref().filter(|n| !n.is_empty()) {
            query = query.filter(users::Column::Nickname.starts_with(nickname));
        }

        let paginator = query
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .paginate(self.db.as_ref(), per_page);
        let total_items = paginator.num_items().await?;
        let models = paginator.fetch_page(page).await?;
        let users = models.into_iter().map(|m| self.to_user(m)).collect::<Result<Vec<_>, _>>()?;

        Ok((users, total_items))
    }

    async fn update_user(&self, payload: UserUpdatePayload) -> Result<(), AppError> {
        let mut active_model = users::ActiveModel { ..Default::default() };

        if let Some(email) = payload.email {
            active_model.email = ActiveValue::Set(email);
        }
        if let Some(nickname) = payload.nickname {
            active_model.nickname = ActiveValue::Set(nickname);
        }
        if let Some(image_url) = payload.image_url {
            active_model.image_url = ActiveValue::Set(image_url);
        }

        if active_model.is_changed() {
            active_model.updated_at = ActiveValue::Set(Utc::now().fixed_offset());

            let result = Users::update_many()
                .set(active_model)
                .filter(users::Column::Id.eq(payload.id))
                .exec(self.db.as_ref())
                .await
                .map_err(Self::map_write_error)?;

            if result.rows_affected == 0 {
                return Err(AppError::NotFound("User not found".to_string()));
            }
        }

        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = Users::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
