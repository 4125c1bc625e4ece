//! In-memory reservation store for tests and local experiments.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{DatabaseRepo, RepoError, RepoResult};
use crate::models::{Reservation, Room, RoomRestriction, User};

#[derive(Default)]
struct State {
    rooms: Vec<Room>,
    users: Vec<User>,
    reservations: Vec<Reservation>,
    restrictions: Vec<RoomRestriction>,
}

/// Vec-backed [`DatabaseRepo`] with the same overlap rules as the SQL store.
///
/// `set_failing(true)` makes every call return [`RepoError::Unavailable`],
/// which is how tests reach the 500 paths.
#[derive(Default)]
pub struct MemoryRepo {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl MemoryRepo {
    /// A store seeded with the two standard rooms.
    pub fn new() -> Self {
        Self::with_rooms(vec![
            Room::new(1, "General's Quarters"),
            Room::new(2, "Major's Suite"),
        ])
    }

    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            state: Mutex::new(State {
                rooms,
                ..State::default()
            }),
            failing: AtomicBool::new(false),
        }
    }

    pub fn add_user(&self, user: User) {
        self.lock().users.push(user);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of stored reservations.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.lock().reservations.clone()
    }

    /// Snapshot of stored restrictions.
    pub fn restrictions(&self) -> Vec<RoomRestriction> {
        self.lock().restrictions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepoError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl State {
    fn room(&self, id: i64) -> RepoResult<&Room> {
        self.rooms
            .iter()
            .find(|r| r.id == id)
            .ok_or(RepoError::RoomNotFound(id))
    }

    fn insert_reservation(&mut self, reservation: &Reservation) -> RepoResult<i64> {
        let room = self.room(reservation.room_id)?.clone();
        let id = self.reservations.len() as i64 + 1;
        let now = Utc::now().naive_utc();
        let mut stored = reservation.clone();
        stored.id = id;
        stored.room = Some(room);
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.reservations.push(stored);
        Ok(id)
    }

    fn insert_restriction(&mut self, restriction: &RoomRestriction) -> RepoResult<()> {
        self.room(restriction.room_id)?;
        self.restrictions.push(restriction.clone());
        Ok(())
    }

    fn is_free(&self, start: NaiveDate, end: NaiveDate, room_id: i64) -> bool {
        !self
            .restrictions
            .iter()
            .any(|r| r.room_id == room_id && r.overlaps(start, end))
    }
}

#[async_trait]
impl DatabaseRepo for MemoryRepo {
    async fn all_users(&self) -> RepoResult<Vec<User>> {
        self.check()?;
        Ok(self.lock().users.clone())
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> RepoResult<i64> {
        self.check()?;
        self.lock().insert_reservation(reservation)
    }

    async fn insert_room_restriction(&self, restriction: &RoomRestriction) -> RepoResult<()> {
        self.check()?;
        self.lock().insert_restriction(restriction)
    }

    async fn book_reservation(&self, reservation: &Reservation) -> RepoResult<i64> {
        self.check()?;
        let mut state = self.lock();
        // both writes happen under one lock, so a failure leaves nothing behind
        state.room(reservation.room_id)?;
        let id = state.insert_reservation(reservation)?;
        let mut restriction = reservation.restriction();
        restriction.reservation_id = Some(id);
        state.insert_restriction(&restriction)?;
        Ok(id)
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i64,
    ) -> RepoResult<bool> {
        self.check()?;
        Ok(self.lock().is_free(start, end, room_id))
    }

    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Room>> {
        self.check()?;
        let state = self.lock();
        let mut rooms: Vec<Room> = state
            .rooms
            .iter()
            .filter(|room| state.is_free(start, end, room.id))
            .cloned()
            .collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    async fn get_room_by_id(&self, id: i64) -> RepoResult<Room> {
        self.check()?;
        self.lock().room(id).cloned()
    }

    async fn get_reservation_by_id(&self, id: i64) -> RepoResult<Reservation> {
        self.check()?;
        self.lock()
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepoError::ReservationNotFound(id))
    }
}
