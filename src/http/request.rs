//! Per-request plumbing.
//!
//! # Responsibilities
//! - Request ID header name and the tracing span that carries it
//! - Peer address extraction for the session's remote IP
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A missing peer address (in-process tests) is not an error

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap, HeaderName, Request},
};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID as set by `SetRequestIdLayer`, `-` when absent or not text.
fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Span for `TraceLayer`, tagged with the request ID set further out.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request_id(request.headers());
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// The connecting peer, when the server was started with connect info.
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientAddr(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_client_addr_from_connect_info() {
        let addr: SocketAddr = "10.1.2.3:4567".parse().unwrap();
        let mut request = Request::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        let (mut parts, ()) = request.into_parts();

        let ClientAddr(found) = ClientAddr::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, Some(addr));
    }

    #[tokio::test]
    async fn test_client_addr_absent() {
        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let ClientAddr(found) = ClientAddr::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_request_id_for_span() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "-");

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");

        headers.insert(X_REQUEST_ID, HeaderValue::from_bytes(b"\xff").unwrap());
        assert_eq!(request_id(&headers), "-");
    }
}
