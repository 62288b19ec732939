use chrono::{DateTime, Utc};

/// The user a report is filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i64,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub id: i64,
    pub title: String,
    pub content: String,
}
