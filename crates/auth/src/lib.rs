mod domain;
mod inbound;
mod outbound;
mod usecase;

use std::sync::Arc;

use app_core::config::Config;
use app_core::jwt::TokenManager;
use app_core::oauth::OAuthManager;
use app_core::uid::Generator;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
pub use inbound::router::create_router;
pub use inbound::state::AuthState;
use sea_orm::DatabaseConnection;
use tower_cookies::Key;

use crate::outbound::orm::UserORM;
use crate::outbound::session::SessionRedis;
use crate::usecase::admin::AdminService;
use crate::usecase::authn::AuthnService;
use crate::usecase::profile::ProfileService;

pub struct Dependency {
    pub db: Arc<DatabaseConnection>,
    pub rds: Pool<RedisConnectionManager>,
    pub config: Arc<Config>,
    pub uid: Arc<dyn Generator>,
    pub token: Arc<dyn TokenManager>,
    pub oauth: OAuthManager,
    pub cookie_key: Key,
}

pub fn new(dep: Dependency) -> AuthState {
    let session = Arc::new(SessionRedis::new(dep.rds));
    let repo = Arc::new(UserORM::new(dep.db));

    let authn_svc = Arc::new(AuthnService::new(
        dep.config.clone(),
        dep.uid,
        dep.token,
        dep.oauth,
        session,
        repo.clone(),
    ));
    let admin_svc = Arc::new(AdminService::new(repo.clone()));
    let profile_svc = Arc::new(ProfileService::new(repo));

    AuthState::new(dep.cookie_key, dep.config, authn_svc, admin_svc, profile_svc)
}
