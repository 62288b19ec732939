use app_core::error::AppError;
use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::{RedisConnectionManager, bb8};

fn session_key(jti: &str) -> String {
    format!("session:{jti}")
}

/// Whitelist of live refresh tokens, keyed by their `jti` claim.
///
/// A refresh token is only honoured while its `jti` is present; rotation and
/// logout remove it.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    /// Whitelists `jti` for `exp_secs` seconds.
    async fn add_token(&self, jti: &str, exp_secs: u64) -> Result<(), AppError>;

    async fn has_token(&self, jti: &str) -> Result<bool, AppError>;

    /// Removes `jti` in a single step and reports whether it was present.
    /// Only the caller that gets `true` may treat the token as consumed.
    async fn delete_token(&self, jti: &str) -> Result<bool, AppError>;
}

/// Redis-backed [`SessionRepository`]; entries expire with the token.
pub struct SessionRedis {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl SessionRedis {
    pub fn new(pool: bb8::Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SessionRedis {
    async fn add_token(&self, jti: &str, exp_secs: u64) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.set_ex(session_key(jti), true, exp_secs).await?;
        Ok(())
    }

    async fn has_token(&self, jti: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(session_key(jti)).await?;
        Ok(exists)
    }

    async fn delete_token(&self, jti: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await?;
        let removed: i64 = conn.del(session_key(jti)).await?;
        Ok(removed > 0)
    }
}
