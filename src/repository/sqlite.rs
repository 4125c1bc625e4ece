//! SQLite-backed reservation store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, Pool, Sqlite};
use tracing::{debug, info};

use super::{DatabaseRepo, RepoError, RepoResult};
use crate::config::DatabaseConfig;
use crate::models::{Reservation, Room, RoomRestriction, User};

#[derive(Clone)]
pub struct SqliteRepo {
    pool: Pool<Sqlite>,
}

impl SqliteRepo {
    /// Open the store described by the config, running migrations.
    pub async fn from_config(config: &DatabaseConfig) -> RepoResult<Self> {
        if config.is_in_memory() {
            Self::open_in_memory().await
        } else {
            Self::open(Path::new(&config.path), config.max_connections).await
        }
    }

    pub async fn open(path: &Path, max_connections: u32) -> RepoResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
            .map_err(|e| RepoError::Connection(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        info!(path = %path.display(), "Reservation database opened");

        let repo = Self { pool };
        repo.run_migrations().await?;
        Ok(repo)
    }

    /// A private database that lives as long as the pool's single connection.
    pub async fn open_in_memory() -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RepoError::Connection(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let repo = Self { pool };
        repo.run_migrations().await?;
        Ok(repo)
    }

    async fn run_migrations(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepoError::Migration(e.to_string()))?;

        info!("Reservation database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

async fn insert_reservation_with<'e, E>(executor: E, res: &Reservation) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO reservations (first_name, last_name, email, phone, start_date, end_date, room_id, processed) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&res.first_name)
    .bind(&res.last_name)
    .bind(&res.email)
    .bind(&res.phone)
    .bind(res.start_date)
    .bind(res.end_date)
    .bind(res.room_id)
    .bind(res.processed)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn insert_restriction_with<'e, E>(executor: E, r: &RoomRestriction) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO room_restrictions (start_date, end_date, room_id, reservation_id, restriction_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(r.start_date)
    .bind(r.end_date)
    .bind(r.room_id)
    .bind(r.reservation_id)
    .bind(r.restriction.id())
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl DatabaseRepo for SqliteRepo {
    async fn all_users(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, access_level, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> RepoResult<i64> {
        let id = insert_reservation_with(&self.pool, reservation).await?;
        debug!(reservation_id = id, room_id = reservation.room_id, "Reservation inserted");
        Ok(id)
    }

    async fn insert_room_restriction(&self, restriction: &RoomRestriction) -> RepoResult<()> {
        insert_restriction_with(&self.pool, restriction).await?;
        Ok(())
    }

    async fn book_reservation(&self, reservation: &Reservation) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await?;

        let id = insert_reservation_with(&mut *tx, reservation).await?;
        let mut restriction = reservation.restriction();
        restriction.reservation_id = Some(id);
        insert_restriction_with(&mut *tx, &restriction).await?;

        tx.commit().await?;

        debug!(reservation_id = id, room_id = reservation.room_id, "Reservation booked");
        Ok(id)
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i64,
    ) -> RepoResult<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(id) FROM room_restrictions WHERE room_id = ? AND ? < end_date AND ? > start_date",
        )
        .bind(room_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count == 0)
    }

    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT r.id, r.room_name, r.created_at, r.updated_at FROM rooms r \
             WHERE r.id NOT IN (SELECT rr.room_id FROM room_restrictions rr WHERE ? < rr.end_date AND ? > rr.start_date) \
             ORDER BY r.id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn get_room_by_id(&self, id: i64) -> RepoResult<Room> {
        sqlx::query_as::<_, Room>(
            "SELECT id, room_name, created_at, updated_at FROM rooms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::RoomNotFound(id))
    }

    async fn get_reservation_by_id(&self, id: i64) -> RepoResult<Reservation> {
        let mut reservation = sqlx::query_as::<_, Reservation>(
            "SELECT id, first_name, last_name, email, phone, start_date, end_date, room_id, \
             processed, created_at, updated_at FROM reservations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::ReservationNotFound(id))?;

        reservation.room = Some(self.get_room_by_id(reservation.room_id).await?);
        Ok(reservation)
    }
}
