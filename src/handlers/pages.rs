//! Informational pages.

use axum::{extract::State, response::Html};

use crate::http::error::HandlerResult;
use crate::http::request::ClientAddr;
use crate::http::server::AppState;
use crate::render::{Page, TemplateData};
use crate::session::Session;

pub async fn home(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    session: Session,
) -> HandlerResult<Html<String>> {
    if let Some(addr) = addr {
        session.put_remote_ip(addr.to_string()).await?;
    }
    Ok(state
        .renderer
        .render(Page::Home, TemplateData::default(), &session)
        .await?)
}

pub async fn about(State(state): State<AppState>, session: Session) -> HandlerResult<Html<String>> {
    let mut data = TemplateData::default().with_string("test", "Hello, again");
    if let Some(ip) = session.remote_ip().await? {
        data = data.with_string("remote_ip", ip);
    }
    Ok(state.renderer.render(Page::About, data, &session).await?)
}

pub async fn generals(State(state): State<AppState>, session: Session) -> HandlerResult<Html<String>> {
    Ok(state
        .renderer
        .render(Page::Generals, TemplateData::default(), &session)
        .await?)
}

pub async fn majors(State(state): State<AppState>, session: Session) -> HandlerResult<Html<String>> {
    Ok(state
        .renderer
        .render(Page::Majors, TemplateData::default(), &session)
        .await?)
}

pub async fn contact(State(state): State<AppState>, session: Session) -> HandlerResult<Html<String>> {
    Ok(state
        .renderer
        .render(Page::Contact, TemplateData::default(), &session)
        .await?)
}
