use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    pub id: i64,
    pub room_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Room {
    /// A room stamped with the current time, as a fresh row would be.
    pub fn new(id: i64, room_name: impl Into<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id,
            room_name: room_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
