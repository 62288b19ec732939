use validator::Validate;

use super::entity::Report;

// ╔════════════════════════════╗
// ║       Create Report        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct CreateReportInput {
    #[validate(email(message = "must be a valid email address"))]
    pub author_email: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "must be between 1 and 5000 characters"))]
    pub content: String,
}

// ╔════════════════════════════╗
// ║      List My Reports       ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct ListMyReportsInput {
    #[validate(email(message = "must be a valid email address"))]
    pub author_email: String,
}

// ╔════════════════════════════╗
// ║      Search Reports        ║
// ╚════════════════════════════╝

#[derive(Debug, Validate)]
pub struct SearchReportsInput {
    pub keyword: Option<String>,

    #[validate(range(min = 1))]
    pub page: u64,

    #[validate(range(min = 1, max = 100))]
    pub per_page: u64,
}

#[derive(Debug)]
pub struct SearchReportsOutput {
    pub reports: Vec<Report>,
    pub total: u64,
}
