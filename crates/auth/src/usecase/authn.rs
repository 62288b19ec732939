use std::sync::Arc;

use app_core::config::Config;
use app_core::error::AppError;
use app_core::jwt::{Role, TokenManager, TokenPair};
use app_core::oauth::{OAuthError, OAuthManager, OAuthProvider};
use app_core::uid::Generator;
use async_trait::async_trait;
use oauth2::CsrfToken;
use validator::Validate;

use crate::domain::entity::oauth::OAuthProfile;
use crate::domain::entity::user::{NewUser, SocialType, User, UserUpdatePayload};
use crate::domain::inout::prelude::*;
use crate::outbound::repository::UserRepository;
use crate::outbound::session::SessionRepository;

const INVALID_REFRESH_TOKEN_MSG: &str = "Invalid refresh token";
const EMAIL_BOUND_ELSEWHERE_MSG: &str = "This email is already registered with a different social account";

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AuthnUseCase: Send + Sync {
    /// Exchanges a provider authorization code for an application token pair,
    /// registering the user on first login.
    async fn social_login(&self, input: SocialLoginInput) -> Result<SocialLoginOutput, AppError>;
    async fn social_authorize(&self, input: SocialAuthorizeInput) -> Result<SocialAuthorizeOutput, AppError>;
    async fn refresh_token(&self, input: RefreshTokenInput) -> Result<RefreshTokenOutput, AppError>;
    async fn logout(&self, input: LogoutInput) -> Result<LogoutOutput, AppError>;
}

#[derive(Clone)]
pub struct AuthnService {
    config: Arc<Config>,
    uid: Arc<dyn Generator>,
    token: Arc<dyn TokenManager>,
    oauth: OAuthManager,
    session: Arc<dyn SessionRepository>,
    repo: Arc<dyn UserRepository>,
}

impl AuthnService {
    pub fn new(
        config: Arc<Config>,
        uid: Arc<dyn Generator>,
        token: Arc<dyn TokenManager>,
        oauth: OAuthManager,
        session: Arc<dyn SessionRepository>,
        repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self { config, uid, token, oauth, session, repo }
    }

    fn social_type(provider: &str) -> Result<SocialType, AppError> {
        SocialType::from_provider(provider).ok_or_else(|| OAuthError::ProviderNotFound(provider.to_string()).into())
    }

    /// Issues a token pair and whitelists the refresh token for its lifetime.
    async fn create_token_session(&self, email: &str, role: Role) -> Result<TokenPair, AppError> {
        let pair = self.token.issue(email, role)?;

        let claims = self.token.validate_refresh_token(&pair.refresh_token)?;
        let ttl = claims.exp.saturating_sub(claims.iat) as u64;
        self.session.add_token(&claims.jti, ttl).await?;

        Ok(pair)
    }

    /// Returns the user owning `profile.email`, creating it on first login.
    ///
    /// A known social account arriving under a new email keeps its user row;
    /// the stored email is replaced with the provider's current one.
    async fn find_or_register(&self, profile: OAuthProfile) -> Result<User, AppError> {
        if let Some(user) = self.repo.find_user_by_email(&profile.email).await? {
            if !user.is_bound_to(profile.social_type, &profile.social_id) {
                tracing::warn!(
                    user_id = user.id,
                    social_type = %profile.social_type,
                    "Login rejected: email already bound to another social account"
                );
                return Err(AppError::Conflict(EMAIL_BOUND_ELSEWHERE_MSG.to_string()));
            }
            return Ok(user);
        }

        if let Some(user) = self.repo.find_user_by_social(profile.social_type, &profile.social_id).await? {
            self.repo
                .update_user(UserUpdatePayload {
                    id: user.id,
                    email: Some(profile.email.clone()),
                    nickname: None,
                    image_url: None,
                })
                .await?;

            tracing::info!(user_id = user.id, social_type = %user.social_type, "Social account email changed");

            return Ok(User { email: profile.email, ..user });
        }

        let user = self
            .repo
            .create_user(NewUser {
                id: self.uid.generate()?,
                social_id: profile.social_id,
                social_type: profile.social_type,
                email: profile.email,
                nickname: profile.nickname,
                image_url: profile.image_url,
                role: Role::Normal,
            })
            .await?;

        tracing::info!(user_id = user.id, social_type = %user.social_type, "Registered new user");

        Ok(user)
    }

    /// With `oauth.refetch_profile` set, the profile is fetched a second time
    /// and the role is read back from the store by the re-fetched email.
    async fn resolve_role(&self, provider: &dyn OAuthProvider, access_token: &str, user: &User) -> Result<Role, AppError> {
        if !self.config.get_or("oauth.refetch_profile", false) {
            return Ok(user.role);
        }

        let profile = provider.fetch_profile(access_token).await?;
        let stored = self.repo.find_user_by_email(&profile.email).await?.ok_or_else(|| {
            tracing::error!(user_id = user.id, "User vanished between registration and role lookup");
            AppError::Internal
        })?;

        Ok(stored.role)
    }
}

#[async_trait]
impl AuthnUseCase for AuthnService {
    async fn social_login(&self, input: SocialLoginInput) -> Result<SocialLoginOutput, AppError> {
        input.validate()?;

        let social_type = Self::social_type(&input.provider)?;
        let provider = Arc::clone(self.oauth.get_provider(&input.provider)?);

        let provider_token = provider.exchange_code(&input.code).await?;
        let profile = provider.fetch_profile(&provider_token.access_token).await?;

        let user = self.find_or_register(OAuthProfile::new(social_type, profile)).await?;
        let role = self.resolve_role(provider.as_ref(), &provider_token.access_token, &user).await?;

        let pair = self.create_token_session(&user.email, role).await?;

        Ok(SocialLoginOutput { access_token: pair.access_token, refresh_token: pair.refresh_token })
    }

    async fn social_authorize(&self, input: SocialAuthorizeInput) -> Result<SocialAuthorizeOutput, AppError> {
        input.validate()?;

        Self::social_type(&input.provider)?;
        let provider = self.oauth.get_provider(&input.provider)?;

        let csrf_token = CsrfToken::new_random();
        let auth_url = provider.authorization_url(csrf_token.secret());

        Ok(SocialAuthorizeOutput { auth_url, csrf_token })
    }

    async fn refresh_token(&self, input: RefreshTokenInput) -> Result<RefreshTokenOutput, AppError> {
        input.validate()?;

        let claims = self.token.validate_refresh_token(&input.refresh_token)?;

        // Consuming the jti is the whitelist check; of two concurrent
        // refreshes with the same token only one removes it.
        if !self.session.delete_token(&claims.jti).await? {
            tracing::warn!(sub = %claims.sub, "Refresh token reused or revoked");
            return Err(AppError::Unauthorized(INVALID_REFRESH_TOKEN_MSG.to_string()));
        }

        let user = self
            .repo
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH_TOKEN_MSG.to_string()))?;

        let pair = self.create_token_session(&user.email, user.role).await?;

        Ok(RefreshTokenOutput { access_token: pair.access_token, refresh_token: pair.refresh_token })
    }

    async fn logout(&self, input: LogoutInput) -> Result<LogoutOutput, AppError> {
        input.validate()?;

        let claims = self.token.validate_refresh_token(&input.refresh_token)?;
        self.session.delete_token(&claims.jti).await?;

        Ok(LogoutOutput { success: true })
    }
}
