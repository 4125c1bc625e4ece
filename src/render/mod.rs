//! Page rendering.
//!
//! # Data Flow
//! ```text
//! handler builds TemplateData
//!     → Renderer::render(page, data, session).await
//!     → add_default_data (pop flash / warning / error from session)
//!     → pages.rs (page body) wrapped by layout.rs (nav, alerts, footer)
//!     → Html<String>
//! ```
//!
//! # Design Decisions
//! - Pages are Rust functions, so a missing field is a compile error
//! - Every interpolated value goes through `html::escape`

mod html;
mod layout;
mod pages;

use std::collections::HashMap;

use axum::response::Html;

use crate::forms::Form;
use crate::models::{Reservation, Room};
use crate::session::{Session, SessionResult};

pub use html::escape;

/// Every page the site can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Contact,
    Generals,
    Majors,
    SearchAvailability,
    ChooseRoom,
    MakeReservation,
    ReservationSummary,
}

impl Page {
    /// Logical template name, also used as the `data-page` marker in the markup.
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Home => "home.page",
            Page::About => "about.page",
            Page::Contact => "contact.page",
            Page::Generals => "generals.page",
            Page::Majors => "majors.page",
            Page::SearchAvailability => "search-availability.page",
            Page::ChooseRoom => "choose-room.page",
            Page::MakeReservation => "make-reservation.page",
            Page::ReservationSummary => "reservation-summary.page",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Contact => "Contact",
            Page::Generals => "General's Quarters",
            Page::Majors => "Major's Suite",
            Page::SearchAvailability => "Search for Availability",
            Page::ChooseRoom => "Choose a Room",
            Page::MakeReservation => "Make Reservation",
            Page::ReservationSummary => "Reservation Summary",
        }
    }
}

/// Values handed from a handler to a page.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub reservation: Option<Reservation>,
    pub rooms: Vec<Room>,
    pub form: Form,
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl TemplateData {
    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.string_map.insert(key.to_string(), value.into());
        self
    }

    pub fn string(&self, key: &str) -> &str {
        self.string_map.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Turns a [`Page`] and its data into a full HTML document.
#[derive(Debug, Clone)]
pub struct Renderer {
    site_name: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("Fort Smythe Bed & Breakfast")
    }
}

impl Renderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    /// Render `page`, consuming any one-shot messages waiting in the session.
    pub async fn render(
        &self,
        page: Page,
        data: TemplateData,
        session: &Session,
    ) -> SessionResult<Html<String>> {
        let data = add_default_data(data, session).await?;
        Ok(Html(self.render_page(page, &data)))
    }

    /// Render without touching a session.
    pub fn render_page(&self, page: Page, data: &TemplateData) -> String {
        let body = pages::body(page, data);
        layout::base(&self.site_name, page, data, &body)
    }
}

async fn add_default_data(mut data: TemplateData, session: &Session) -> SessionResult<TemplateData> {
    if data.flash.is_none() {
        data.flash = session.pop_flash().await?;
    }
    if data.warning.is_none() {
        data.warning = session.pop_warning().await?;
    }
    if data.error.is_none() {
        data.error = session.pop_error().await?;
    }
    Ok(data)
}
