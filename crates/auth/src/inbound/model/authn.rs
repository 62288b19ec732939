use serde::{Deserialize, Serialize};

// ╔════════════════════════════╗
// ║       Social Login         ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct SocialLoginRequest {
    pub code: String,
}

/// Shared by social login and token refresh.
#[derive(Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ╔════════════════════════════╗
// ║      OAuth Callback        ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct OAuthCallbackRequest {
    pub code: Option<String>,
    #[serde(default)]
    pub state: String,
    pub error: Option<String>,
}

// ╔════════════════════════════╗
// ║      Refresh Token         ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ╔════════════════════════════╗
// ║          Logout            ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
