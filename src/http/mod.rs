//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID span, peer address)
//!     → handlers
//!     → error.rs (failures become 500)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::{HandlerError, HandlerResult};
pub use request::{ClientAddr, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
