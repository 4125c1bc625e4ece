//! Handler error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::repository::RepoError;

/// Anything that stops a handler from producing its page.
///
/// Every variant is answered with a bare `500 Internal Server Error`; the
/// detail only goes to the log.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("data store: {0}")]
    Repo(#[from] RepoError),

    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid room id {0:?}")]
    InvalidRoomId(String),

    #[error("missing parameter {0:?}")]
    MissingParam(&'static str),

    #[error("cannot parse form: {0}")]
    Form(String),

    #[error("session: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        (status, "Internal Server Error").into_response()
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
