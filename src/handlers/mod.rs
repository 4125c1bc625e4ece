//! Request handlers.
//!
//! # Data Flow
//! ```text
//! GET  /search-availability      → search form
//! POST /search-availability      → choose-room page (draft with dates in session)
//! GET  /choose-room/{id}         → draft gets room id → /make-reservation
//! GET  /book-room?id=&s=&e=      → fresh draft with room + dates → /make-reservation
//! GET  /make-reservation         → guest details form
//! POST /make-reservation         → validate → book → /reservation-summary
//! GET  /reservation-summary      → summary (draft removed from session)
//! ```
//!
//! Missing session state sends the visitor home with an error message;
//! malformed input or a failing store is a 500.

pub mod availability;
pub mod pages;
pub mod reservation;

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use chrono::NaiveDate;

use crate::http::error::{HandlerError, HandlerResult};
use crate::models::parse_date;

pub(crate) const NO_DRAFT: &str = "Can't get reservation from session";

/// Posted form fields, sent either `application/x-www-form-urlencoded` or
/// `multipart/form-data`. Non-text multipart parts are rejected.
#[derive(Debug, Clone, Default)]
pub struct FormFields(pub HashMap<String, String>);

impl FormFields {
    /// Submitted value, empty when the field was not sent.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&request) {
            let axum::Form(values) = axum::Form::<HashMap<String, String>>::from_request(request, state)
                .await
                .map_err(|rejection| HandlerError::Form(rejection.body_text()))?;
            return Ok(Self(values));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| HandlerError::Form(rejection.body_text()))?;
        let mut values = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| HandlerError::Form(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let text = field
                .text()
                .await
                .map_err(|e| HandlerError::Form(e.body_text()))?;
            values.insert(name, text);
        }
        Ok(Self(values))
    }
}

pub(crate) fn date(value: &str) -> HandlerResult<NaiveDate> {
    parse_date(value).map_err(|source| HandlerError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

pub(crate) fn room_id(value: &str) -> HandlerResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| HandlerError::InvalidRoomId(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn fields(content_type: &str, body: &'static str) -> HandlerResult<FormFields> {
        let request = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        FormFields::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_urlencoded_fields() {
        let fields = fields(
            "application/x-www-form-urlencoded",
            "start=2024-01-01&end=2024-01-02&room_id=1",
        )
        .await
        .unwrap();
        assert_eq!(fields.get("start"), "2024-01-01");
        assert_eq!(fields.get("room_id"), "1");
        assert_eq!(fields.get("missing"), "");
    }

    #[tokio::test]
    async fn test_multipart_fields() {
        let body = "--XyZ\r\n\
                    Content-Disposition: form-data; name=\"start\"\r\n\r\n\
                    2024-01-01\r\n\
                    --XyZ\r\n\
                    Content-Disposition: form-data; name=\"room_id\"\r\n\r\n\
                    2\r\n\
                    --XyZ--\r\n";
        let fields = fields("multipart/form-data; boundary=XyZ", body).await.unwrap();
        assert_eq!(fields.get("start"), "2024-01-01");
        assert_eq!(fields.get("room_id"), "2");
    }

    #[tokio::test]
    async fn test_other_content_type_is_rejected() {
        let err = fields("text/plain", "start=2024-01-01").await.unwrap_err();
        assert!(matches!(err, HandlerError::Form(_)));
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert!(matches!(date("02/01/2024"), Err(HandlerError::InvalidDate { .. })));
    }

    #[test]
    fn test_room_id() {
        assert_eq!(room_id("7").unwrap(), 7);
        assert!(matches!(room_id("seven"), Err(HandlerError::InvalidRoomId(_))));
    }
}
