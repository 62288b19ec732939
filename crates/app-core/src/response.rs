//! The JSON envelope for successful responses: `{message, data, meta?}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Meta {
    pub total_items: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl Meta {
    pub fn new(total_items: u64, current_page: u64, per_page: u64) -> Self {
        let total_pages = if per_page == 0 { 0 } else { total_items.div_ceil(per_page) };
        Self { total_items, current_page, per_page, total_pages }
    }
}

#[derive(Serialize)]
pub struct Response<T> {
    #[serde(skip)]
    status: StatusCode,
    message: String,
    data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

impl<T> Response<T> {
    pub fn with_message(data: T, message: &str) -> Self {
        Self { status: StatusCode::OK, message: message.to_string(), data, meta: None }
    }

    pub fn with_meta(data: T, meta: Meta) -> Self {
        Self { status: StatusCode::OK, message: "Successfully".to_string(), data, meta: Some(meta) }
    }

    /// A `201 Created` response.
    pub fn created(data: T) -> Self {
        Self { status: StatusCode::CREATED, message: "Created".to_string(), data, meta: None }
    }
}

impl<T> From<T> for Response<T> {
    fn from(data: T) -> Self {
        Self { status: StatusCode::OK, message: "Successfully".to_string(), data, meta: None }
    }
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use serde_json::{Value, json};

    use super::*;

    async fn body_of(resp: axum::response::Response) -> Value {
        let body_bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[test]
    fn test_meta_new() {
        assert_eq!(Meta::new(25, 1, 10), Meta { total_items: 25, current_page: 1, per_page: 10, total_pages: 3 });
        assert_eq!(Meta::new(20, 2, 10).total_pages, 2);
        assert_eq!(Meta::new(0, 1, 10).total_pages, 0);
        assert_eq!(Meta::new(5, 1, 0).total_pages, 0);
    }

    #[test]
    fn test_response_from() {
        let resp: Response<&str> = Response::from("abc");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.message, "Successfully");
        assert!(resp.meta.is_none());
    }

    #[tokio::test]
    async fn test_response_with_message() {
        let http_resp = Response::with_message("abc", "Hello!").into_response();

        assert_eq!(http_resp.status(), StatusCode::OK);
        let json_val = body_of(http_resp).await;
        assert_eq!(json_val["message"], json!("Hello!"));
        assert_eq!(json_val["data"], json!("abc"));
        assert!(json_val.get("meta").is_none());
        assert!(json_val.get("status").is_none());
    }

    #[tokio::test]
    async fn test_response_with_meta() {
        let http_resp = Response::with_meta(vec![1, 2], Meta::new(12, 2, 2)).into_response();

        let json_val = body_of(http_resp).await;
        assert_eq!(json_val["data"], json!([1, 2]));
        assert_eq!(json_val["meta"]["total_items"], json!(12));
        assert_eq!(json_val["meta"]["current_page"], json!(2));
        assert_eq!(json_val["meta"]["total_pages"], json!(6));
    }

    #[tokio::test]
    async fn test_response_created() {
        let http_resp = Response::created(json!({ "id": 1 })).into_response();

        assert_eq!(http_resp.status(), StatusCode::CREATED);
        let json_val = body_of(http_resp).await;
        assert_eq!(json_val["message"], json!("Created"));
        assert_eq!(json_val["data"]["id"], json!(1));
    }
}
