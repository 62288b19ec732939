use validator::Validate;

// ╔════════════════════════════╗
// ║        Get Profile         ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct GetProfileInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

// ╔════════════════════════════╗
// ║      Update Profile        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct UpdateProfileInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub nickname: String,
}
