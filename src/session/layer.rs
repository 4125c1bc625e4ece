//! Session cookie layer and the per-request [`Session`] handle.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};

use super::store::{SessionData, SessionMap};
use crate::config::SessionConfig;
use crate::models::Reservation;

/// Key the typed [`SessionData`] lives under in the session record.
const DATA_KEY: &str = "bookings.data";

pub type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Cookie layer for the site: idle expiry, refreshed on every request that
/// saves the session.
pub fn session_layer(store: SessionMap, config: &SessionConfig) -> SessionManagerLayer<SessionMap> {
    let lifetime = i64::try_from(config.lifetime_secs).unwrap_or(i64::MAX);
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(lifetime)))
}

/// Typed view of the visitor's session, extracted in handlers.
#[derive(Debug, Clone)]
pub struct Session(tower_sessions::Session);

impl Session {
    async fn load(&self) -> SessionResult<SessionData> {
        Ok(self.0.get::<SessionData>(DATA_KEY).await?.unwrap_or_default())
    }

    /// Apply `f` and write back only when it changed something, so read-only
    /// visits never create a session.
    async fn update<T>(&self, f: impl FnOnce(&mut SessionData) -> T) -> SessionResult<T> {
        let mut data = self.load().await?;
        let before = data.clone();
        let out = f(&mut data);
        if data != before {
            self.0.insert(DATA_KEY, &data).await?;
        }
        Ok(out)
    }

    pub async fn draft(&self) -> SessionResult<Option<Reservation>> {
        Ok(self.load().await?.draft)
    }

    pub async fn put_draft(&self, reservation: Reservation) -> SessionResult<()> {
        self.update(|d| d.draft = Some(reservation)).await
    }

    /// Remove and return the draft.
    pub async fn take_draft(&self) -> SessionResult<Option<Reservation>> {
        self.update(|d| d.draft.take()).await
    }

    pub async fn remote_ip(&self) -> SessionResult<Option<String>> {
        Ok(self.load().await?.remote_ip)
    }

    pub async fn put_remote_ip(&self, ip: impl Into<String>) -> SessionResult<()> {
        let ip = ip.into();
        self.update(|d| d.remote_ip = Some(ip)).await
    }

    pub async fn put_flash(&self, message: impl Into<String>) -> SessionResult<()> {
        let message = message.into();
        self.update(|d| d.flash = Some(message)).await
    }

    pub async fn put_warning(&self, message: impl Into<String>) -> SessionResult<()> {
        let message = message.into();
        self.update(|d| d.warning = Some(message)).await
    }

    pub async fn put_error(&self, message: impl Into<String>) -> SessionResult<()> {
        let message = message.into();
        self.update(|d| d.error = Some(message)).await
    }

    pub async fn pop_flash(&self) -> SessionResult<Option<String>> {
        self.update(|d| d.flash.take()).await
    }

    pub async fn pop_warning(&self) -> SessionResult<Option<String>> {
        self.update(|d| d.warning.take()).await
    }

    pub async fn pop_error(&self) -> SessionResult<Option<String>> {
        self.update(|d| d.error.take()).await
    }

    /// Forget everything about this visitor; the cookie is expired on the way out.
    pub async fn destroy(&self) -> SessionResult<()> {
        self.0.flush().await
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = <tower_sessions::Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map(Session)
    }
}
