//! OAuth 2.0 authorization-code clients for the supported social login
//! providers.
//!
//! Kakao is the only provider today. Its token endpoint answers without a
//! `token_type`, so the exchange is performed directly over `reqwest` instead
//! of through `oauth2::BasicClient`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use oauth2::url::{Url, form_urlencoded};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, redirect};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Authorization code exchange failed with status {0}")]
    ExchangeFailed(u16),

    #[error("Profile request failed with status {0}")]
    ProfileFetchFailed(u16),

    #[error("Provider response is missing '{0}'")]
    MalformedResponse(String),

    #[error("OAuth provider '{0}' not found")]
    ProviderNotFound(String),
}

/// Tokens granted by the provider in exchange for an authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderToken {
    pub access_token: String,
    pub refresh_token: String,
}

/// The subset of a provider's user profile the application keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthUserProfile {
    pub social_id: String,
    pub email: String,
    pub nickname: String,
    pub image_url: String,
}

#[async_trait::async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait OAuthProvider: Send + Sync {
    /// Builds the consent page URL the browser is redirected to.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchanges an authorization code for provider tokens.
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, OAuthError>;

    /// Fetches the user's profile with a provider access token.
    async fn fetch_profile(&self, access_token: &str) -> Result<OAuthUserProfile, OAuthError>;
}

fn default_auth_host() -> String {
    "https://kauth.kakao.com".to_string()
}

fn default_api_host() -> String {
    "https://kapi.kakao.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoConfig {
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default = "default_auth_host")]
    pub auth_host: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug)]
pub struct KakaoOAuthProvider {
    client_id: String,
    redirect_uri: String,
    authorize_endpoint: Url,
    token_endpoint: Url,
    profile_endpoint: Url,
    http: Client,
}

impl KakaoOAuthProvider {
    pub fn new(config: KakaoConfig) -> Result<Self, OAuthError> {
        let auth_host = config.auth_host.trim_end_matches('/');
        let api_host = config.api_host.trim_end_matches('/');
        Url::parse(&config.redirect_uri)?;

        let http = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {:?}", e);
                OAuthError::HttpClient(e)
            })?;

        Ok(Self {
            authorize_endpoint: Url::parse(&format!("{auth_host}/oauth/authorize"))?,
            token_endpoint: Url::parse(&format!("{auth_host}/oauth/token"))?,
            profile_endpoint: Url::parse(&format!("{api_host}/v2/user/me"))?,
            client_id: config.client_id,
            redirect_uri: config.redirect_uri,
            http,
        })
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, OAuthError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Provider returned a non-JSON body: {:?}", e);
            OAuthError::MalformedResponse("body".to_string())
        })
    }
}

/// Reads the string at a dotted `path` of a JSON document.
fn string_at(body: &Value, path: &str) -> Result<String, OAuthError> {
    path.split('.')
        .try_fold(body, |node, key| node.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OAuthError::MalformedResponse(path.to_string()))
}

#[async_trait::async_trait]
impl OAuthProvider for KakaoOAuthProvider {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, OAuthError> {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("code", code)
            .finish();

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Kakao token exchange rejected with status {}", status);
            return Err(OAuthError::ExchangeFailed(status.as_u16()));
        }

        let body = Self::read_json(response).await?;

        Ok(ProviderToken {
            access_token: string_at(&body, "access_token")?,
            refresh_token: string_at(&body, "refresh_token")?,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<OAuthUserProfile, OAuthError> {
        let response = self
            .http
            .post(self.profile_endpoint.clone())
            .query(&[("access_token", access_token)])
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body("")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Kakao profile request rejected with status {}", status);
            return Err(OAuthError::ProfileFetchFailed(status.as_u16()));
        }

        let body = Self::read_json(response).await?;

        // Kakao documents `id` as a number; some gateways stringify it.
        let social_id = match body.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(OAuthError::MalformedResponse("id".to_string())),
        };

        Ok(OAuthUserProfile {
            social_id,
            email: string_at(&body, "kakao_account.email")?,
            nickname: string_at(&body, "properties.nickname")?,
            image_url: string_at(&body, "properties.profile_image")?,
        })
    }
}

#[derive(Clone, Default)]
pub struct OAuthManager {
    providers: HashMap<String, Arc<dyn OAuthProvider>>,
}

impl OAuthManager {
    pub fn new() -> Self {
        Self { providers: HashMap::new() }
    }

    pub fn add_provider(&mut self, name: &str, provider: Arc<dyn OAuthProvider>) {
        self.providers.insert(name.to_string(), provider);
    }

    pub fn get_provider(&self, name: &str) -> Result<&Arc<dyn OAuthProvider>, OAuthError> {
        self.providers
            .get(name)
            .ok_or_else(|| OAuthError::ProviderNotFound(name.to_string()))
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn kakao_config(host: &str) -> KakaoConfig {
        KakaoConfig {
            client_id: "rest-api-key".to_string(),
            redirect_uri: "http://localhost:3000/oauth".to_string(),
            auth_host: host.to_string(),
            api_host: host.to_string(),
            timeout_secs: 5,
        }
    }

    fn is_form(headers: &HeaderMap) -> bool {
        headers.get("content-type").and_then(|v| v.to_str().ok()) == Some(FORM_CONTENT_TYPE)
    }

    // Answers 200 only when the request carries the expected form and header.
    async fn token_endpoint(headers: HeaderMap, body: String) -> (StatusCode, Json<Value>) {
        let form: HashMap<String, String> = form_urlencoded::parse(body.as_bytes()).into_owned().collect();
        let expected = [
            ("grant_type", "authorization_code"),
            ("client_id", "rest-api-key"),
            ("redirect_uri", "http://localhost:3000/oauth"),
            ("code", "abc123"),
        ];
        let form_ok = expected.iter().all(|(k, v)| form.get(*k).map(String::as_str) == Some(*v));

        if !is_form(&headers) || !form_ok {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" })));
        }
        (StatusCode::OK, Json(json!({ "access_token": "AT1", "refresh_token": "RT1" })))
    }

    async fn profile_endpoint(
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !is_form(&headers) || query.get("access_token").map(String::as_str) != Some("AT1") {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "this access token does not exist" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "id": "999",
                "kakao_account": { "email": "a@b.com" },
                "properties": { "nickname": "Ann", "profile_image": "http://img/1.png" }
            })),
        )
    }

    async fn kakao_stub() -> KakaoOAuthProvider {
        let router =
            Router::new().route("/oauth/token", post(token_endpoint)).route("/v2/user/me", post(profile_endpoint));
        let host = spawn_provider(router).await;
        KakaoOAuthProvider::new(kakao_config(&host)).unwrap()
    }

    async fn provider_answering(path: &'static str, status: StatusCode, body: Value) -> KakaoOAuthProvider {
        let router = Router::new().route(path, post(move || async move { (status, Json(body)) }));
        let host = spawn_provider(router).await;
        KakaoOAuthProvider::new(kakao_config(&host)).unwrap()
    }

    #[test]
    fn test_oauth_manager() {
        let mut manager = OAuthManager::new();
        manager.add_provider("kakao", Arc::new(MockOAuthProvider::new()));

        assert!(manager.has_provider("kakao"));
        assert!(manager.get_provider("kakao").is_ok());
        assert!(matches!(manager.get_provider("naver"), Err(OAuthError::ProviderNotFound(name)) if name == "naver"));
    }

    #[test]
    fn test_kakao_config_defaults() {
        let config: KakaoConfig =
            serde_json::from_value(json!({ "client_id": "id", "redirect_uri": "http://localhost:3000/oauth" }))
                .unwrap();

        assert_eq!(config.auth_host, "https://kauth.kakao.com");
        assert_eq!(config.api_host, "https://kapi.kakao.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_kakao_provider_invalid_redirect_url() {
        let mut config = kakao_config("https://kauth.kakao.com");
        config.redirect_uri = "not a url".to_string();

        assert!(matches!(KakaoOAuthProvider::new(config), Err(OAuthError::InvalidUrl(_))));
    }

    #[test]
    fn test_kakao_authorization_url() {
        let provider = KakaoOAuthProvider::new(kakao_config("https://kauth.kakao.com/")).unwrap();

        let url = provider.authorization_url("csrf-state");

        assert!(url.starts_with("https://kauth.kakao.com/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=rest-api-key"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Foauth"));
        assert!(url.contains("state=csrf-state"));
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let provider = kakao_stub().await;

        let token = provider.exchange_code("abc123").await.unwrap();

        assert_eq!(token, ProviderToken { access_token: "AT1".to_string(), refresh_token: "RT1".to_string() });
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let provider = kakao_stub().await;

        let result = provider.exchange_code("stale-code").await;

        assert!(matches!(result, Err(OAuthError::ExchangeFailed(400))));
    }

    #[tokio::test]
    async fn test_exchange_code_missing_refresh_token() {
        let provider = provider_answering("/oauth/token", StatusCode::OK, json!({ "access_token": "AT1" })).await;

        let result = provider.exchange_code("abc123").await;

        assert!(matches!(result, Err(OAuthError::MalformedResponse(path)) if path == "refresh_token"));
    }

    #[tokio::test]
    async fn test_fetch_profile_success() {
        let provider = kakao_stub().await;

        let profile = provider.fetch_profile("AT1").await.unwrap();

        assert_eq!(
            profile,
            OAuthUserProfile {
                social_id: "999".to_string(),
                email: "a@b.com".to_string(),
                nickname: "Ann".to_string(),
                image_url: "http://img/1.png".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_profile_numeric_id() {
        let body = json!({
            "id": 999,
            "kakao_account": { "email": "a@b.com" },
            "properties": { "nickname": "Ann", "profile_image": "http://img/1.png" }
        });
        let provider = provider_answering("/v2/user/me", StatusCode::OK, body).await;

        let profile = provider.fetch_profile("AT1").await.unwrap();

        assert_eq!(profile.social_id, "999");
    }

    #[tokio::test]
    async fn test_fetch_profile_without_kakao_account() {
        let body = json!({
            "id": "999",
            "properties": { "nickname": "Ann", "profile_image": "http://img/1.png" }
        });
        let provider = provider_answering("/v2/user/me", StatusCode::OK, body).await;

        let result = provider.fetch_profile("AT1").await;

        assert!(matches!(result, Err(OAuthError::MalformedResponse(path)) if path == "kakao_account.email"));
    }

    #[tokio::test]
    async fn test_fetch_profile_rejected() {
        let provider = kakao_stub().await;

        let result = provider.fetch_profile("expired-token").await;

        assert!(matches!(result, Err(OAuthError::ProfileFetchFailed(401))));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let provider = KakaoOAuthProvider::new(kakao_config(&host)).unwrap();

        let result = provider.exchange_code("abc123").await;

        assert!(matches!(result, Err(OAuthError::HttpClient(_))));
    }
}
