//! The application-wide error type and its mapping onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bb8_redis::{bb8, redis};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::config::ConfigError;
use super::jwt::JwtError;
use super::oauth::OAuthError;
use super::uid::SnowflakeError;

const INTERNAL_MESSAGE: &str = "An internal server error occurred";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Validation failed")]
    ValidationStr(String),

    #[error("Invalid request format: {0}")]
    RequestFormat(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Internal Libraries
    #[error("Config operation failed")]
    Config(#[from] ConfigError),

    #[error("JWT operation failed")]
    Jwt(#[from] JwtError),

    #[error("OAuth operation failed")]
    OAuth(#[from] OAuthError),

    #[error("Snowflake operation failed")]
    IdGeneration(#[from] SnowflakeError),

    // Third Party Libraries
    #[error("Sea ORM operation failed")]
    Database(#[from] sea_orm::DbErr),

    #[error("Redis operation failed")]
    Redis(#[from] redis::RedisError),

    #[error("Redis connection pool operation failed")]
    RedisPool(#[from] bb8::RunError<redis::RedisError>),

    #[error("Serde JSON operation failed")]
    JsonParse(#[from] serde_json::Error),

    #[error("An internal server error occurred")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn internal() -> (StatusCode, String, Option<serde_json::Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string(), None)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation(err) => {
                let details = json!(err.field_errors());
                (StatusCode::UNPROCESSABLE_ENTITY, "Validation failed".to_string(), Some(details))
            },
            AppError::RequestFormat(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::ValidationStr(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),

            // Internal Libraries
            AppError::Config(err) => {
                tracing::error!("Config getter error: {:?}", err);
                internal()
            },
            AppError::Jwt(err) => {
                tracing::error!("JWT error: {:?}", err);
                match err {
                    JwtError::TokenExpired | JwtError::InvalidToken => (StatusCode::UNAUTHORIZED, err.to_string(), None),
                    JwtError::TokenCreation => internal(),
                }
            },
            AppError::OAuth(err) => {
                tracing::warn!("OAuth provider error: {:?}", err);
                match err {
                    OAuthError::ExchangeFailed(_) => {
                        (StatusCode::BAD_REQUEST, "Authorization code was rejected by the provider".to_string(), None)
                    },
                    OAuthError::InvalidUrl(_) | OAuthError::ProviderNotFound(_) => {
                        (StatusCode::BAD_REQUEST, err.to_string(), None)
                    },
                    OAuthError::ProfileFetchFailed(_) | OAuthError::MalformedResponse(_) | OAuthError::HttpClient(_) => {
                        (StatusCode::BAD_GATEWAY, "OAuth provider unavailable".to_string(), None)
                    },
                }
            },
            AppError::IdGeneration(err) => {
                tracing::error!("ID generation error: {:?}", err);
                internal()
            },

            // Third Party Libraries
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                internal()
            },
            AppError::Redis(err) | AppError::RedisPool(bb8::RunError::User(err)) => {
                tracing::error!("Redis error: {:?}", err);
                internal()
            },
            AppError::RedisPool(bb8::RunError::TimedOut) => {
                tracing::error!("Redis connection pool timed out");
                internal()
            },
            AppError::JsonParse(err) => {
                tracing::error!("Failed to parse JSON: {:?}", err);
                internal()
            },
            AppError::Internal => internal(),
        };

        (status, Json(ErrorResponse { message, details })).into_response()
    }
}
