//! Bed and breakfast booking site.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌──────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ http::server (tower-http layers)           │
//!                            │        │                                     │
//!                            │        ▼                                     │
//!                            │   session (cookie → typed SessionData)       │
//!                            │        │                                     │
//!                            │        ▼                                     │
//!                            │   handlers ──▶ forms (validation)            │
//!                            │        │   ──▶ repository (SQLite / memory)  │
//!                            │        ▼                                     │
//!     ◀──────────────────────┼── render (Page + TemplateData → HTML)        │
//!                            │                                              │
//!                            │   config · observability · lifecycle · net   │
//!                            └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod handlers;
pub mod http;
pub mod models;
pub mod repository;
pub mod session;

// Presentation
pub mod forms;
pub mod render;

// Cross-cutting concerns
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use config::schema::BookingConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use repository::{DatabaseRepo, MemoryRepo, SqliteRepo};
