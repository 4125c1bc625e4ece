use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Room;

/// A guest's booking, from first search through to the stored row.
///
/// While the guest is still moving through the pages the value lives in their
/// session with `id == 0`; it gets a real id and timestamps once the booking
/// is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i64,
    /// Snapshot of the room taken when the guest picked it.
    #[sqlx(skip)]
    pub room: Option<Room>,
    /// Set by staff once the booking has been handled.
    pub processed: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Reservation {
    /// Start a draft for the given stay; the room and guest details come later.
    pub fn for_stay(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            start_date,
            end_date,
            room_id: 0,
            room: None,
            processed: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Room name for display, empty until a room has been attached.
    pub fn room_name(&self) -> &str {
        self.room.as_ref().map(|r| r.room_name.as_str()).unwrap_or("")
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// The restriction that blocks this reservation's room once it is stored.
    pub fn restriction(&self) -> RoomRestriction {
        RoomRestriction {
            start_date: self.start_date,
            end_date: self.end_date,
            room_id: self.room_id,
            reservation_id: Some(self.id),
            restriction: RestrictionKind::Reservation,
        }
    }
}

/// Why a room is blocked for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionKind {
    Reservation,
    OwnerBlock,
}

impl RestrictionKind {
    /// Row id in the `restrictions` table.
    pub fn id(self) -> i64 {
        match self {
            RestrictionKind::Reservation => 1,
            RestrictionKind::OwnerBlock => 2,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(RestrictionKind::Reservation),
            2 => Some(RestrictionKind::OwnerBlock),
            _ => None,
        }
    }
}

/// A block on a room for `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRestriction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i64,
    /// Owner blocks are not tied to a reservation.
    pub reservation_id: Option<i64>,
    pub restriction: RestrictionKind,
}

impl RoomRestriction {
    /// Whether this block collides with a stay from `start` to `end`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start < self.end_date && end > self.start_date
    }
}
