//! Request size limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size (413 Payload Too Large)

use tower_http::limit::RequestBodyLimitLayer;

pub fn body_limit(max_body_size: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_body_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", post(|body: String| async move { body.len().to_string() }))
            .layer(body_limit(16))
    }

    #[tokio::test]
    async fn test_small_body_passes() {
        let response = app()
            .oneshot(Request::post("/").body(Body::from("tiny")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let response = app()
            .oneshot(Request::post("/").body(Body::from("x".repeat(64))).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
