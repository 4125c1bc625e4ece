//! Visitor session subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie: session=<id>
//!     → tower-sessions layer (load record from SessionMap)
//!     → handler reads/writes typed SessionData through Session
//!     → tower-sessions layer (save, Set-Cookie with a fresh Max-Age,
//!       or a removal cookie for destroyed sessions)
//!
//! Background:
//!     store.rs reaper purges idle sessions until shutdown
//! ```
//!
//! # Design Decisions
//! - Session contents are a typed struct stored under one key
//! - Sessions are created lazily on first write; read-only visits leave no state
//! - Expiry is idle-based and refreshed whenever the session is saved

pub mod layer;
pub mod store;

pub use layer::{session_layer, Session, SessionResult};
pub use store::{SessionData, SessionMap};
