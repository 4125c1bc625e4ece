//! Data-access layer.
//!
//! # Data Flow
//! ```text
//! handlers
//!     → Arc<dyn DatabaseRepo> (held in AppState)
//!     → sqlite.rs (sqlx pool, migrations)     production
//!     → memory.rs (Vec-backed fake)           tests
//! ```
//!
//! # Design Decisions
//! - Handlers only see the trait; the store is picked at startup
//! - Errors are opaque to handlers and become a 500
//! - Booking writes the reservation and its room restriction in one transaction

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Reservation, Room, RoomRestriction, User};

pub use memory::MemoryRepo;
pub use sqlite::SqliteRepo;

/// Errors raised by a reservation store.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Room {0} not found")]
    RoomNotFound(i64),

    #[error("Reservation {0} not found")]
    ReservationNotFound(i64),

    #[error("Store unavailable")]
    Unavailable,
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        RepoError::Query(e.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Everything the handlers need from the reservation store.
#[async_trait]
pub trait DatabaseRepo: Send + Sync {
    /// List staff accounts.
    async fn all_users(&self) -> RepoResult<Vec<User>>;

    /// Store a reservation row and return its new id.
    async fn insert_reservation(&self, reservation: &Reservation) -> RepoResult<i64>;

    /// Store a room restriction row.
    async fn insert_room_restriction(&self, restriction: &RoomRestriction) -> RepoResult<()>;

    /// Store a reservation together with the restriction that blocks its room.
    /// Either both rows exist afterwards or neither does.
    async fn book_reservation(&self, reservation: &Reservation) -> RepoResult<i64>;

    /// True when nothing blocks `room_id` between `start` and `end`.
    async fn search_availability_by_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i64,
    ) -> RepoResult<bool>;

    /// Rooms with no restriction overlapping `start`..`end`, ordered by id.
    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Room>>;

    async fn get_room_by_id(&self, id: i64) -> RepoResult<Room>;

    /// A stored reservation with its room attached.
    async fn get_reservation_by_id(&self, id: i64) -> RepoResult<Reservation>;
}
