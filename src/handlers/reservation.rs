//! Guest details, booking, and the summary page.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use super::{FormFields, NO_DRAFT};
use crate::forms::Form;
use crate::http::error::HandlerResult;
use crate::http::server::AppState;
use crate::models::{Reservation, DATE_LAYOUT};
use crate::observability::metrics;
use crate::render::{Page, TemplateData};
use crate::session::Session;

fn reservation_data(draft: Reservation, form: Form) -> TemplateData {
    let start = draft.start_date.format(DATE_LAYOUT).to_string();
    let end = draft.end_date.format(DATE_LAYOUT).to_string();
    TemplateData {
        reservation: Some(draft),
        form,
        ..TemplateData::default()
    }
    .with_string("start_date", start)
    .with_string("end_date", end)
}

pub async fn form(State(state): State<AppState>, session: Session) -> HandlerResult<Response> {
    let Some(mut draft) = session.draft().await? else {
        session.put_error(NO_DRAFT).await?;
        return Ok(Redirect::to("/").into_response());
    };

    let room = state.repo.get_room_by_id(draft.room_id).await?;
    draft.room = Some(room);
    session.put_draft(draft.clone()).await?;

    Ok(state
        .renderer
        .render(
            Page::MakeReservation,
            reservation_data(draft, Form::default()),
            &session,
        )
        .await?
        .into_response())
}

pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    FormFields(values): FormFields,
) -> HandlerResult<Response> {
    let Some(mut draft) = session.draft().await? else {
        session.put_error(NO_DRAFT).await?;
        return Ok(Redirect::to("/").into_response());
    };

    let mut form = Form::new(values);
    draft.first_name = form.get("first_name").to_string();
    draft.last_name = form.get("last_name").to_string();
    draft.phone = form.get("phone").to_string();
    draft.email = form.get("email").to_string();

    form.required(&["first_name", "last_name", "email"])
        .min_length("first_name", 3)
        .is_email("email");

    if !form.valid() {
        tracing::debug!(errors = form.errors.len(), "Reservation form rejected");
        return Ok(state
            .renderer
            .render(Page::MakeReservation, reservation_data(draft, form), &session)
            .await?
            .into_response());
    }

    let id = state.repo.book_reservation(&draft).await?;
    draft.id = id;
    metrics::record_reservation_booked(draft.room_id);
    tracing::info!(
        reservation_id = id,
        room_id = draft.room_id,
        nights = draft.nights(),
        "Reservation booked"
    );

    session.put_draft(draft).await?;
    session.put_flash("Reservation submitted").await?;
    Ok(Redirect::to("/reservation-summary").into_response())
}

pub async fn summary(State(state): State<AppState>, session: Session) -> HandlerResult<Response> {
    let Some(draft) = session.take_draft().await? else {
        session.put_error(NO_DRAFT).await?;
        return Ok(Redirect::temporary("/").into_response());
    };

    Ok(state
        .renderer
        .render(
            Page::ReservationSummary,
            reservation_data(draft, Form::default()),
            &session,
        )
        .await?
        .into_response())
}
