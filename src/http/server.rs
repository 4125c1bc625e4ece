//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (sessions, metrics, tracing, limits, request ID)
//! - Bind server to a plain or TLS listener
//! - Run the session reaper alongside the server until shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::request;
use crate::config::BookingConfig;
use crate::handlers::{availability, pages, reservation};
use crate::lifecycle::{shutdown, Shutdown};
use crate::observability::metrics;
use crate::render::Renderer;
use crate::repository::DatabaseRepo;
use crate::security;
use crate::session::{session_layer, SessionMap};

/// How long in-flight requests may run after a TLS shutdown is requested.
const TLS_DRAIN_GRACE: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn DatabaseRepo>,
    pub renderer: Arc<Renderer>,
    pub sessions: SessionMap,
    pub config: Arc<BookingConfig>,
}

impl AppState {
    pub fn new(config: BookingConfig, repo: Arc<dyn DatabaseRepo>) -> Self {
        Self {
            repo,
            renderer: Arc::new(Renderer::default()),
            sessions: SessionMap::new(),
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the booking site.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: BookingConfig, repo: Arc<dyn DatabaseRepo>) -> Self {
        let state = AppState::new(config, repo);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let router = Router::new()
            .route("/", get(pages::home))
            .route("/about", get(pages::about))
            .route("/generals", get(pages::generals))
            .route("/majors", get(pages::majors))
            .route("/contact", get(pages::contact))
            .route(
                "/search-availability",
                get(availability::search_form).post(availability::search),
            )
            .route("/search-availability-json", post(availability::search_json))
            .route("/choose-room/{id}", get(availability::choose_room))
            .route("/book-room", get(availability::book_room))
            .route(
                "/make-reservation",
                get(reservation::form).post(reservation::submit),
            )
            .route("/reservation-summary", get(reservation::summary))
            .layer(session_layer(state.sessions.clone(), &config.session))
            .layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(security::body_limit(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        if config.security.enable_headers {
            security::with_security_headers(router)
        } else {
            router
        }
    }

    /// The fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn spawn_reaper(&self, shutdown: &Shutdown) {
        let every = Duration::from_secs(self.state.config.session.purge_interval_secs);
        let store = self.state.sessions.clone();
        tokio::spawn(store.run_reaper(every, shutdown.subscribe()));
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, tls = false, "HTTP server starting");

        self.spawn_reaper(shutdown);

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown.subscribe()))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: &Shutdown,
    ) -> Result<(), io::Error> {
        tracing::info!(address = %addr, tls = true, "HTTP server starting");

        self.spawn_reaper(shutdown);

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            shutdown::wait(rx).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_GRACE));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
