use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A staff account. Passwords never leave the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub access_level: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
