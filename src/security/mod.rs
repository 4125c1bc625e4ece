//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies with 413)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (X-Frame-Options, X-Content-Type-Options, Referrer-Policy)
//! ```

pub mod headers;
pub mod limits;

pub use headers::with_security_headers;
pub use limits::body_limit;
