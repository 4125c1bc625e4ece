//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bookings_http_requests_total` (counter): requests by method, route, status
//! - `bookings_http_request_duration_seconds` (histogram): latency by route
//! - `bookings_reservations_total` (counter): committed bookings by room
//! - `bookings_availability_searches_total` (counter): searches by kind and outcome
//! - `bookings_active_sessions` (gauge): live visitor sessions
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve Prometheus metrics on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "bookings_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "bookings_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_reservation_booked(room_id: i64) {
    metrics::counter!("bookings_reservations_total", "room_id" => room_id.to_string()).increment(1);
}

/// `kind` is `all_rooms` or `single_room`.
pub fn record_availability_search(kind: &'static str, available: bool) {
    let outcome = if available { "available" } else { "unavailable" };
    metrics::counter!(
        "bookings_availability_searches_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_active_sessions(count: usize) {
    metrics::gauge!("bookings_active_sessions").set(count as f64);
}

/// Middleware counting every request by its route template.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
