use std::sync::Arc;

use app_core::config::Config;
use tower_cookies::Key;

use crate::usecase::admin::AdminUseCase;
use crate::usecase::authn::AuthnUseCase;
use crate::usecase::profile::ProfileUseCase;

#[derive(Clone)]
pub struct AuthState {
    pub cookie_key: Key,
    pub config: Arc<Config>,
    pub authn: Arc<dyn AuthnUseCase>,
    pub admin: Arc<dyn AdminUseCase>,
    pub profile: Arc<dyn ProfileUseCase>,
}

impl AuthState {
    pub fn new(
        cookie_key: Key,
        config: Arc<Config>,
        authn: Arc<dyn AuthnUseCase>,
        admin: Arc<dyn AdminUseCase>,
        profile: Arc<dyn ProfileUseCase>,
    ) -> Self {
        Self { cookie_key, config, authn, admin, profile }
    }
}
