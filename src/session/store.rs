//! Server-side session storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tower_sessions::{
    session::{Id, Record},
    session_store, SessionStore,
};

use crate::models::Reservation;
use crate::observability::metrics;

/// Everything remembered about one visitor between page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// The reservation being built across the booking pages.
    pub draft: Option<Reservation>,
    pub remote_ip: Option<String>,
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Concurrent map of live session records.
///
/// The session layer owns expiry: every save carries the record's new expiry
/// date. Loading an expired record behaves as if it never existed.
#[derive(Debug, Clone, Default)]
pub struct SessionMap {
    records: Arc<DashMap<Id, Record>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.records.len();
        self.records.retain(|_, record| record.expiry_date > now);
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sweep expired sessions every `every` until shutdown fires.
    pub async fn run_reaper(self, every: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = self.len(), "Expired sessions purged");
                    }
                    metrics::record_active_sessions(self.len());
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Session reaper stopping");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl SessionStore for SessionMap {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // ids are random; draw again on the rare collision
        loop {
            match self.records.entry(record.id) {
                Entry::Occupied(_) => record.id = Id::default(),
                Entry::Vacant(slot) => {
                    slot.insert(record.clone());
                    break;
                }
            }
        }
        metrics::record_active_sessions(self.records.len());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        let live = self
            .records
            .get(id)
            .map(|record| record.clone())
            .filter(|record| record.expiry_date > now);
        if live.is_none() {
            self.records.remove(id);
        }
        Ok(live)
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records.remove(id);
        metrics::record_active_sessions(self.records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(ttl: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        }
    }

    #[tokio::test]
    async fn test_create_load_delete() {
        let store = SessionMap::new();
        let mut rec = record(time::Duration::minutes(5));
        rec.data.insert("k".into(), serde_json::json!("v"));

        store.create(&mut rec).await.unwrap();
        assert_eq!(store.len(), 1);

        let loaded = store.load(&rec.id).await.unwrap().expect("record is live");
        assert_eq!(loaded.data.get("k"), Some(&serde_json::json!("v")));

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_redraws_taken_id() {
        let store = SessionMap::new();
        let mut first = record(time::Duration::minutes(5));
        store.create(&mut first).await.unwrap();

        let mut second = record(time::Duration::minutes(5));
        second.id = first.id;
        store.create(&mut second).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_save_replaces_expiry() {
        let store = SessionMap::new();
        let mut rec = record(time::Duration::minutes(5));
        store.create(&mut rec).await.unwrap();

        rec.expiry_date = OffsetDateTime::now_utc() - time::Duration::seconds(1);
        store.save(&rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(store.is_empty(), "expired load removes the record");
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionMap::new();
        for _ in 0..3 {
            store.create(&mut record(time::Duration::seconds(-1))).await.unwrap();
        }
        store.create(&mut record(time::Duration::minutes(5))).await.unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.purge_expired(), 3);
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn test_session_data_survives_json() {
        let data = SessionData {
            remote_ip: Some("127.0.0.1:4000".into()),
            flash: Some("Reservation submitted".into()),
            ..SessionData::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(serde_json::from_value::<SessionData>(value).unwrap(), data);
    }

    #[tokio::test]
    async fn test_reaper_stops_on_shutdown() {
        let store = SessionMap::new();
        store.create(&mut record(time::Duration::seconds(-1))).await.unwrap();

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(store.clone().run_reaper(Duration::from_millis(5), rx));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.is_empty());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reaper should stop")
            .unwrap();
    }
}
