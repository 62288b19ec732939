//! Application middleware: bearer authentication, role guarding and request
//! logging.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;

use super::error::AppError;
use super::jwt::{Claims, Role, TokenManager};

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required.".to_string()))
    }
}

pub async fn auth(
    State(tm): State<Arc<dyn TokenManager>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid authorization header".to_string()))?;

    let claims = tm.validate_access_token(token)?;

    let (mut parts, body) = req.into_parts();
    parts.extensions.insert(claims);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// The set of roles allowed through [`require_role`].
#[derive(Clone, Debug)]
pub struct RoleGuard {
    allowed: Arc<[Role]>,
}

impl RoleGuard {
    pub fn new(allowed: &[Role]) -> Self {
        Self { allowed: Arc::from(allowed) }
    }

    pub fn admin() -> Self {
        Self::new(&[Role::Admin])
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Rejects requests whose authenticated role is not in the guard's set.
///
/// Must run after [`auth`]: with `route_layer`, add this layer first and the
/// `auth` layer after it.
pub async fn require_role(
    State(guard): State<RoleGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required.".to_string()))?;

    if !guard.permits(claims.role) {
        tracing::warn!(sub = %claims.sub, role = %claims.role, "Role not permitted for route");
        return Err(AppError::Forbidden("Insufficient role for this resource".to_string()));
    }

    Ok(next.run(req).await)
}

/// The caller's `x-request-id` when it is readable ASCII, otherwise a fresh
/// UUID.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

pub async fn request_response_logger(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let start_time = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let c_id = request_id(req.headers());

    req.extensions_mut().insert(c_id.clone());

    tracing::info!(
        _cID = c_id,
        method = %method,
        uri = %uri,
        version = ?version,
        "Incoming request"
    );

    let mut response = next.run(req).await;

    let duration = start_time.elapsed();
    let status = response.status();

    response.headers_mut().insert(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_str(c_id.as_str()).unwrap_or_else(|_| HeaderValue::from_static("invalid-correlation-id")),
    );

    let log_level = if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "warn"
    } else {
        "info"
    };

    match log_level {
        "error" => tracing::error!(
            _cID = c_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = duration.as_millis(),
            "Request completed with server error"
        ),
        "warn" => tracing::warn!(
            _cID = c_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = duration.as_millis(),
            "Request completed with client error"
        ),
        _ => tracing::info!(
            _cID = c_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = duration.as_millis(),
            "Request completed successfully"
        ),
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    use super::*;
    use crate::jwt::{Claims, JwtError, MockTokenManager, Role, TokenManager};

    fn claims_for(role: Role) -> Claims {
        Claims {
            sub: "a@b.com".to_string(),
            role,
            exp: 9999999999,
            jti: "".into(),
            iss: "".into(),
            aud: "".into(),
            iat: 1,
        }
    }

    fn token_manager() -> Arc<dyn TokenManager> {
        let mut tm = MockTokenManager::new();
        tm.expect_validate_access_token().returning(|token| match token {
            "normal_token" => Ok(claims_for(Role::Normal)),
            "admin_token" => Ok(claims_for(Role::Admin)),
            _ => Err(JwtError::InvalidToken),
        });
        Arc::new(tm)
    }

    async fn test_handler(claims: Claims) -> impl IntoResponse {
        format!("Hello, user: {}", claims.sub)
    }

    fn protected_app() -> Router {
        let tm = token_manager();
        Router::new()
            .route("/protected", get(test_handler))
            .route_layer(middleware::from_fn_with_state(tm.clone(), auth))
            .with_state(tm)
    }

    fn admin_app() -> Router {
        let tm = token_manager();
        Router::new()
            .route("/admin", get(test_handler))
            .route_layer(middleware::from_fn_with_state(RoleGuard::admin(), require_role))
            .route_layer(middleware::from_fn_with_state(tm.clone(), auth))
            .with_state(tm)
    }

    fn request(uri: &str, token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_role_guard_permits() {
        let guard = RoleGuard::new(&[Role::Normal, Role::Admin]);
        assert!(guard.permits(Role::Normal));
        assert!(guard.permits(Role::Admin));

        let admin_only = RoleGuard::admin();
        assert!(!admin_only.permits(Role::Normal));
        assert!(admin_only.permits(Role::Admin));
    }

    #[tokio::test]
    async fn test_auth_success() {
        let response = protected_app().oneshot(request("/protected", Some("normal_token"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body_str, "Hello, user: a@b.com");
    }

    #[tokio::test]
    async fn test_auth_error() {
        let response = protected_app().oneshot(request("/protected", Some("invalid_token"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_role_missing_token() {
        let response = admin_app().oneshot(request("/admin", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_role_forbidden_for_normal_user() {
        let response = admin_app().oneshot(request("/admin", Some("normal_token"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_require_role_allows_admin() {
        let response = admin_app().oneshot(request("/admin", Some("admin_token"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_require_role_without_auth_layer() {
        let app = Router::new()
            .route("/admin", get(|| async { "unreachable" }))
            .route_layer(middleware::from_fn_with_state(RoleGuard::admin(), require_role));

        let response = app.oneshot(request("/admin", Some("admin_token"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_logger_propagates_request_id() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(request_response_logger));

        let req = axum::http::Request::builder()
            .uri("/ping")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");

        let response = app.oneshot(request("/ping", None)).await.unwrap();
        let generated = response.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[test]
    fn test_request_id_falls_back_for_unreadable_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let id = request_id(&headers);

        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
