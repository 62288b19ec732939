use oauth2::CsrfToken;
use validator::Validate;

// ╔════════════════════════════╗
// ║       Social Login         ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct SocialLoginInput {
    #[validate(length(min = 1, message = "provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "authorization code is required"))]
    pub code: String,
}

#[derive(Debug, PartialEq)]
pub struct SocialLoginOutput {
    pub access_token: String,
    pub refresh_token: String,
}

// ╔════════════════════════════╗
// ║     Social Authorize       ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct SocialAuthorizeInput {
    #[validate(length(min = 1, message = "provider is required"))]
    pub provider: String,
}

#[derive(Debug)]
pub struct SocialAuthorizeOutput {
    pub auth_url: String,
    pub csrf_token: CsrfToken,
}

// ╔════════════════════════════╗
// ║       Refresh Token        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct RefreshTokenInput {
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, PartialEq)]
pub struct RefreshTokenOutput {
    pub access_token: String,
    pub refresh_token: String,
}

// ╔════════════════════════════╗
// ║          Logout            ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct LogoutInput {
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug)]
pub struct LogoutOutput {
    pub success: bool,
}
