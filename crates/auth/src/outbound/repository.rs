use app_core::error::AppError;
use async_trait::async_trait;

use crate::domain::entity::user::{NewUser, SocialType, User, UserFilter, UserUpdatePayload};

/// Persistence for user records. Email is the unique key.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_social(&self, social_type: SocialType, social_id: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user. A user with the same email or the same social
    /// account already present yields [`AppError::Conflict`].
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Returns one zero-based `page` of users, newest first, and the total
    /// number of matches.
    async fn find_users(&self, filter: UserFilter, page: u64, per_page: u64) -> Result<(Vec<User>, u64), AppError>;

    /// Changing the email to one another user holds yields
    /// [`AppError::Conflict`].
    async fn update_user(&self, payload: UserUpdatePayload) -> Result<(), AppError>;

    /// Hard-deletes a user; their reports go with them.
    async fn delete_user(&self, id: i64) -> Result<(), AppError>;
}
