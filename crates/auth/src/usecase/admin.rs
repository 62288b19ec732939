use std::sync::Arc;

use app_core::error::AppError;
use async_trait::async_trait;
use validator::Validate;

use crate::domain::entity::user::UserFilter;
use crate::domain::inout::prelude::*;
use crate::outbound::repository::UserRepository;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AdminUseCase: Send + Sync {
    async fn list_users(&self, input: ListUsersInput) -> Result<ListUsersOutput, AppError>;
    async fn delete_user(&self, input: DeleteUserInput) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn UserRepository>,
}

impl AdminService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AdminUseCase for AdminService {
    async fn list_users(&self, input: ListUsersInput) -> Result<ListUsersOutput, AppError> {
        input.validate()?;

        let filter = UserFilter { email: input.email, nickname: input.nickname };
        let (users, total) = self.repo.find_users(filter, input.page - 1, input.per_page).await?;

        Ok(ListUsersOutput { users, total })
    }

    async fn delete_user(&self, input: DeleteUserInput) -> Result<(), AppError> {
        input.validate()?;

        self.repo.delete_user(input.user_id).await?;
        tracing::info!(user_id = input.user_id, "User deleted by admin");

        Ok(())
    }
}
