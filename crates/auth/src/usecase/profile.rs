use std::sync::Arc;

use app_core::error::AppError;
use async_trait::async_trait;
use validator::Validate;

use crate::domain::entity::user::{User, UserUpdatePayload};
use crate::domain::inout::prelude::*;
use crate::outbound::repository::UserRepository;

const USER_NOT_FOUND_MSG: &str = "User not found";

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ProfileUseCase: Send + Sync {
    async fn get_profile(&self, input: GetProfileInput) -> Result<User, AppError>;
    async fn update_profile(&self, input: UpdateProfileInput) -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        self.repo
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MSG.to_string()))
    }
}

#[async_trait]
impl ProfileUseCase for ProfileService {
    async fn get_profile(&self, input: GetProfileInput) -> Result<User, AppError> {
        input.validate()?;

        self.get_user_by_email(&input.email).await
    }

    async fn update_profile(&self, mut input: UpdateProfileInput) -> Result<User, AppError> {
        input.nickname = input.nickname.trim().to_string();
        input.validate()?;

        let user = self.get_user_by_email(&input.email).await?;

        self.repo
            .update_user(UserUpdatePayload {
                id: user.id,
                email: None,
                nickname: Some(input.nickname),
                image_url: None,
            })
            .await?;

        self.repo
            .find_user_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MSG.to_string()))
    }
}
