use validator::Validate;

use super::super::entity::user::User;

// ╔════════════════════════════╗
// ║        List Users          ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct ListUsersInput {
    #[validate(range(min = 1))]
    pub page: u64,

    #[validate(range(min = 1, max = 100))]
    pub per_page: u64,

    pub email: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug)]
pub struct ListUsersOutput {
    pub users: Vec<User>,
    pub total: u64,
}

// ╔════════════════════════════╗
// ║        Delete User         ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct DeleteUserInput {
    #[validate(range(min = 1))]
    pub user_id: i64,
}
