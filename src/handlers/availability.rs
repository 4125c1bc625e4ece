//! Searching for rooms and picking one.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{date, room_id, FormFields, NO_DRAFT};
use crate::http::error::{HandlerError, HandlerResult};
use crate::http::server::AppState;
use crate::models::{Reservation, DATE_LAYOUT};
use crate::observability::metrics;
use crate::render::{Page, TemplateData};
use crate::session::Session;

/// Warning shown when check-out is not after check-in.
const NIGHTS_REQUIRED: &str = "Departure must be after arrival";

pub async fn search_form(State(state): State<AppState>, session: Session) -> HandlerResult<Html<String>> {
    Ok(state
        .renderer
        .render(Page::SearchAvailability, TemplateData::default(), &session)
        .await?)
}

pub async fn search(
    State(state): State<AppState>,
    session: Session,
    fields: FormFields,
) -> HandlerResult<Response> {
    let start = date(fields.get("start"))?;
    let end = date(fields.get("end"))?;

    if end <= start {
        session.put_warning(NIGHTS_REQUIRED).await?;
        return Ok(Redirect::to("/search-availability").into_response());
    }

    let rooms = state.repo.search_availability_for_all_rooms(start, end).await?;
    metrics::record_availability_search("all_rooms", !rooms.is_empty());
    tracing::debug!(%start, %end, rooms = rooms.len(), "Availability search");

    if rooms.is_empty() {
        session.put_error("No availability").await?;
        return Ok(Redirect::to("/search-availability").into_response());
    }

    session.put_draft(Reservation::for_stay(start, end)).await?;

    let data = TemplateData {
        rooms,
        ..TemplateData::default()
    };
    Ok(state
        .renderer
        .render(Page::ChooseRoom, data, &session)
        .await?
        .into_response())
}

/// Body of `POST /search-availability-json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
    pub room_id: String,
    pub start_date: String,
    pub end_date: String,
}

pub async fn search_json(
    State(state): State<AppState>,
    posted: Result<FormFields, HandlerError>,
) -> Json<AvailabilityResponse> {
    let fields = posted.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unreadable availability request");
        FormFields::default()
    });
    let field = |name: &str| fields.get(name).to_string();

    let mut response = AvailabilityResponse {
        ok: false,
        message: String::new(),
        room_id: field("room_id"),
        start_date: field("start"),
        end_date: field("end"),
    };

    let parsed = date(&response.start_date).and_then(|start| {
        let end = date(&response.end_date)?;
        let room = room_id(&response.room_id)?;
        Ok((start, end, room))
    });
    let (start, end, room) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "Invalid availability request");
            response.message = "Invalid request parameters".into();
            return Json(response);
        }
    };

    match state
        .repo
        .search_availability_by_dates_by_room_id(start, end, room)
        .await
    {
        Ok(available) => {
            metrics::record_availability_search("single_room", available);
            response.ok = available;
        }
        Err(e) => {
            tracing::error!(error = %e, room_id = room, "Availability query failed");
            response.message = "Error querying database".into();
        }
    }
    Json(response)
}

pub async fn choose_room(
    session: Session,
    Path(raw_id): Path<String>,
) -> HandlerResult<Redirect> {
    let id = room_id(&raw_id)?;

    let Some(mut draft) = session.draft().await? else {
        session.put_error(NO_DRAFT).await?;
        return Ok(Redirect::to("/"));
    };
    draft.room_id = id;
    session.put_draft(draft).await?;
    Ok(Redirect::to("/make-reservation"))
}

pub async fn book_room(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult<Redirect> {
    let param = |name: &'static str| {
        params
            .get(name)
            .map(String::as_str)
            .ok_or(HandlerError::MissingParam(name))
    };
    let id = room_id(param("id")?)?;
    let start = date(param("s")?)?;
    let end = date(param("e")?)?;

    let room = state.repo.get_room_by_id(id).await?;
    tracing::debug!(
        room_id = id,
        start = %start.format(DATE_LAYOUT),
        end = %end.format(DATE_LAYOUT),
        "Booking room from room page"
    );

    let mut draft = Reservation::for_stay(start, end);
    draft.room_id = room.id;
    draft.room = Some(room);
    session.put_draft(draft).await?;
    Ok(Redirect::to("/make-reservation"))
}
