use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ╔════════════════════════════╗
// ║          Profile           ║
// ╚════════════════════════════╝

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub image_url: String,
    pub social_type: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            image_url: user.image_url,
            social_type: user.social_type.to_string(),
            role: user.role.to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

// ╔════════════════════════════╗
// ║      Update Profile        ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub nickname: String,
}
