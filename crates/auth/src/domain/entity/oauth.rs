use app_core::oauth::OAuthUserProfile;

use super::user::SocialType;

/// A provider profile tagged with the provider it came from. Lives for one
/// login request.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    /// Provider-scoped, immutable identifier.
    pub social_id: String,
    pub social_type: SocialType,
    pub email: String,
    pub nickname: String,
    pub image_url: String,
}

impl OAuthProfile {
    pub fn new(social_type: SocialType, profile: OAuthUserProfile) -> Self {
        Self {
            social_id: profile.social_id,
            social_type,
            email: profile.email,
            nickname: profile.nickname,
            image_url: profile.image_url,
        }
    }
}
