//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use tokio::net::TcpListener;
use tower::ServiceExt;

use bookings::config::BookingConfig;
use bookings::models::{RestrictionKind, RoomRestriction};
use bookings::repository::DatabaseRepo;
use bookings::{HttpServer, MemoryRepo, Shutdown};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Router over a fresh in-memory store.
pub fn app() -> (Router, Arc<MemoryRepo>) {
    app_with(BookingConfig::default())
}

pub fn app_with(config: BookingConfig) -> (Router, Arc<MemoryRepo>) {
    let repo = Arc::new(MemoryRepo::new());
    let server = HttpServer::new(config, repo.clone());
    (server.router(), repo)
}

/// Block `room_id` for the given stay as the owner would.
pub async fn owner_block(repo: &MemoryRepo, room_id: i64, start: &str, end: &str) {
    repo.insert_room_restriction(&RoomRestriction {
        start_date: date(start),
        end_date: date(end),
        room_id,
        reservation_id: None,
        restriction: RestrictionKind::OwnerBlock,
    })
    .await
    .unwrap();
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

/// Drives a router in-process like a browser: keeps the session cookie.
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

impl Browser {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.builder("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        self.post_raw(uri, "application/x-www-form-urlencoded", body)
            .await
    }

    pub async fn post_raw(&mut self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        let request = self
            .builder("POST", uri)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    fn builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = if pair.ends_with('=') { None } else { Some(pair) };
        }

        let status = response.status();
        let headers = response.headers().clone();
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .map(|v| v.to_str().unwrap().to_string())
        };
        let location = text(header::LOCATION);
        let content_type = text(header::CONTENT_TYPE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            content_type,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

/// Start the real server on an ephemeral port.
pub async fn start_server() -> (SocketAddr, Shutdown, Arc<MemoryRepo>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let repo = Arc::new(MemoryRepo::new());
    let server = HttpServer::new(BookingConfig::default(), repo.clone());
    let shutdown = Shutdown::new();
    let handle = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, &handle).await.unwrap();
    });

    (addr, shutdown, repo)
}
