use std::fmt;

use app_core::jwt::Role;
use chrono::{DateTime, Utc};

/// Identity provider a user signed up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialType {
    Kakao = 1,
}

impl SocialType {
    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            1 => Some(SocialType::Kakao),
            _ => None,
        }
    }

    /// Maps a route's `{provider}` segment onto a social type.
    pub fn from_provider(provider: &str) -> Option<Self> {
        match provider.to_lowercase().as_str() {
            "kakao" => Some(SocialType::Kakao),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialType::Kakao => "kakao",
        }
    }
}

impl fmt::Display for SocialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub social_id: String,
    pub social_type: SocialType,
    pub email: String,
    pub nickname: String,
    pub image_url: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True when this user was registered through the given social account.
    pub fn is_bound_to(&self, social_type: SocialType, social_id: &str) -> bool {
        self.social_type == social_type && self.social_id == social_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: i64,
    pub social_id: String,
    pub social_type: SocialType,
    pub email: String,
    pub nickname: String,
    pub image_url: String,
    pub role: Role,
}

/// Prefix filters for the admin user listing. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub email: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct UserUpdatePayload {
    pub id: i64,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub image_url: Option<String>,
}
