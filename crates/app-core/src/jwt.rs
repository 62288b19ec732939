//! Issues and validates the application's JSON Web Tokens.
//!
//! Tokens identify a user by email (`sub`) and carry the user's [`Role`] so
//! that route guards can authorize without a database round trip.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token format or signature")]
    InvalidToken,

    #[error("Failed to create token")]
    TokenCreation,
}

/// Authorization level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Normal = 0,
    Admin = 1,
}

impl Role {
    /// Decodes the stored role code; unknown codes yield `None`.
    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            0 => Some(Role::Normal),
            1 => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Normal => "normal",
            Role::Admin => "admin",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated user.
    pub sub: String,
    pub role: Role,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenManager: Send + Sync {
    /// Issues a fresh access/refresh pair for `subject` with the given role.
    fn issue(&self, subject: &str, role: Role) -> Result<TokenPair, JwtError>;
    fn create_access_token(&self, subject: &str, role: Role) -> Result<String, JwtError>;
    fn create_refresh_token(&self, subject: &str, role: Role) -> Result<String, JwtError>;
    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError>;
}

pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_exp_secs: i64,
    pub refresh_exp_secs: i64,
    pub issuer: String,
    pub audience: String,
}

pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn create_token(&self, subject: &str, role: Role, secret: &str, expires_in_secs: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(expires_in_secs)).timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            jti: Uuid::new_v4().to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            exp,
            iat,
        };

        encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(secret.as_ref())).map_err(|e| {
            tracing::error!("Failed to sign token: {:?}", e);
            JwtError::TokenCreation
        })
    }

    fn validate_token(&self, token: &str, secret: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken,
            })
    }
}

impl TokenManager for JwtService {
    fn issue(&self, subject: &str, role: Role) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.create_access_token(subject, role)?,
            refresh_token: self.create_refresh_token(subject, role)?,
        })
    }

    fn create_access_token(&self, subject: &str, role: Role) -> Result<String, JwtError> {
        self.create_token(subject, role, &self.config.access_secret, self.config.access_exp_secs)
    }

    fn create_refresh_token(&self, subject: &str, role: Role) -> Result<String, JwtError> {
        self.create_token(subject, role, &self.config.refresh_secret, self.config.refresh_exp_secs)
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, &self.config.access_secret)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, &self.config.refresh_secret)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const EMAIL: &str = "a@b.com";

    fn create_test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test_access_secret_key_12345".to_string(),
            refresh_secret: "test_refresh_secret_key_12345".to_string(),
            access_exp_secs: 3600,   // 1 hour
            refresh_exp_secs: 86400, // 24 hours
            issuer: "test_issuer".to_string(),
            audience: "test_audience".to_string(),
        }
    }

    fn create_jwt_service() -> JwtService {
        JwtService::new(create_test_config())
    }

    #[test]
    fn test_role_from_i16_and_display() {
        assert_eq!(Role::from_i16(0), Some(Role::Normal));
        assert_eq!(Role::from_i16(1), Some(Role::Admin));
        assert_eq!(Role::from_i16(42), None);
        assert_eq!(Role::from_i16(-1), None);
        assert_eq!(Role::Admin as i16, 1);
        assert_eq!(Role::Normal.to_string(), "normal");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_issue_returns_distinct_non_empty_tokens() {
        let service = create_jwt_service();

        let pair = service.issue(EMAIL, Role::Normal).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.access_token.split('.').count(), 3);
    }

    #[test]
    fn test_issued_tokens_validate_with_their_own_secret() {
        let service = create_jwt_service();
        let pair = service.issue(EMAIL, Role::Admin).unwrap();

        let access = service.validate_access_token(&pair.access_token).unwrap();
        assert_eq!(access.sub, EMAIL);
        assert_eq!(access.role, Role::Admin);
        assert_eq!(access.iss, "test_issuer");
        assert_eq!(access.aud, "test_audience");
        assert!(!access.jti.is_empty());

        let refresh = service.validate_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, EMAIL);
        assert_eq!(refresh.role, Role::Admin);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_claims_timestamps() {
        let service = create_jwt_service();

        let before_creation = Utc::now().timestamp() as usize;
        let token = service.create_access_token(EMAIL, Role::Normal).unwrap();
        let after_creation = Utc::now().timestamp() as usize;

        let claims = service.validate_access_token(&token).unwrap();

        assert!(claims.iat >= before_creation);
        assert!(claims.iat <= after_creation);
        assert_eq!(claims.exp, claims.iat + service.config.access_exp_secs as usize);
    }

    #[test]
    fn test_access_token_rejected_as_refresh_token() {
        let service = create_jwt_service();
        let token = service.create_access_token(EMAIL, Role::Normal).unwrap();

        assert!(matches!(service.validate_refresh_token(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_validate_malformed_token() {
        let service = create_jwt_service();

        assert!(matches!(service.validate_access_token("not_a_valid_jwt_at_all"), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_token_expiration() {
        let mut config = create_test_config();
        config.access_exp_secs = -1_000_000;
        let service = JwtService::new(config);

        let token = service.create_access_token(EMAIL, Role::Normal).unwrap();

        assert!(matches!(service.validate_access_token(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let service = create_jwt_service();
        let mut other_config = create_test_config();
        other_config.issuer = "someone_else".to_string();
        let other = JwtService::new(other_config);

        let token = other.create_access_token(EMAIL, Role::Admin).unwrap();

        assert!(matches!(service.validate_access_token(&token), Err(JwtError::InvalidToken)));
    }
}
