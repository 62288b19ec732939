//! Conversions from axum extractor rejections into [`AppError`].

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use super::error::AppError;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::RequestFormat(rejection.to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::RequestFormat(rejection.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::RequestFormat(rejection.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::rejection::QueryRejection;

    use super::*;

    #[tokio::test]
    async fn test_query_rejection_is_request_format() {
        let uri: axum::http::Uri = "/admin/users?page=abc".parse().unwrap();
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Page {
            page: u64,
        }

        let rejection: QueryRejection = axum::extract::Query::<Page>::try_from_uri(&uri).unwrap_err();

        assert!(matches!(AppError::from(rejection), AppError::RequestFormat(_)));
    }
}
