use serde::Deserialize;

const DEFAULT_PER_PAGE: u64 = 10;

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

// ╔════════════════════════════╗
// ║        List Users          ║
// ╚════════════════════════════╝

#[derive(Deserialize)]
pub struct ListUsersRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub email: Option<String>,
    pub nickname: Option<String>,
}
