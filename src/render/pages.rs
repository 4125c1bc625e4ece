use chrono::NaiveDate;

use super::html::escape;
use super::{Page, TemplateData};
use crate::forms::Form;
use crate::models::DATE_LAYOUT;

pub fn body(page: Page, data: &TemplateData) -> String {
    match page {
        Page::Home => home(),
        Page::About => about(data),
        Page::Contact => contact(),
        Page::Generals => room_page(
            1,
            "General's Quarters",
            "Your home away from home, set on the majestic waters of the Atlantic Ocean.",
        ),
        Page::Majors => room_page(
            2,
            "Major's Suite",
            "A bright corner suite with a private balcony and a view of the harbour.",
        ),
        Page::SearchAvailability => search_availability(),
        Page::ChooseRoom => choose_room(data),
        Page::MakeReservation => make_reservation(data),
        Page::ReservationSummary => reservation_summary(data),
    }
}

fn home() -> String {
    r#"<h1>Welcome to Fort Smythe Bed and Breakfast</h1>
<p>Your home away from home, set on the majestic waters of the Atlantic Ocean,
this will be a vacation to remember.</p>
<p><a class="btn" href="/search-availability">Make Reservation Now</a></p>
"#
    .to_string()
}

fn about(data: &TemplateData) -> String {
    let ip = data.string("remote_ip");
    let ip_line = if ip.is_empty() {
        "I don't know your IP address yet. Visit the Home page so I can set it.".to_string()
    } else {
        format!("Your remote IP address is {}", escape(ip))
    };
    format!(
        "<h1>This is the about page</h1>\n<p>{}</p>\n<p>{}</p>\n",
        escape(data.string("test")),
        ip_line
    )
}

fn contact() -> String {
    r#"<h1>Contact</h1>
<p>Fort Smythe Bed &amp; Breakfast, 100 Rocky Point Road, Fort Smythe.</p>
<p>Call us on 555-555-5555 or write to <a href="mailto:info@fortsmythe.example">info@fortsmythe.example</a>.</p>
"#
    .to_string()
}

/// Room page with an inline availability check against the JSON endpoint.
fn room_page(room_id: i64, name: &str, blurb: &str) -> String {
    format!(
        r#"<h1>{name}</h1>
<p>{blurb}</p>
<form id="check-availability" data-room-id="{room_id}">
<label>Arrival <input type="date" name="start" required></label>
<label>Departure <input type="date" name="end" required></label>
<input type="hidden" name="room_id" value="{room_id}">
<button class="btn" type="submit">Check Availability</button>
</form>
<p id="availability-result"></p>
<script>
document.getElementById("check-availability").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const body = new FormData(event.target);
  const response = await fetch("/search-availability-json", {{ method: "POST", body }});
  const data = await response.json();
  const out = document.getElementById("availability-result");
  if (data.ok) {{
    const link = document.createElement("a");
    link.className = "btn";
    link.href = "/book-room?id=" + encodeURIComponent(data.room_id)
      + "&s=" + encodeURIComponent(data.start_date)
      + "&e=" + encodeURIComponent(data.end_date);
    link.textContent = "Book now!";
    out.replaceChildren(link);
  }} else {{
    out.textContent = data.message || "No availability";
  }}
}});
</script>
"#,
        name = escape(name),
        blurb = escape(blurb),
    )
}

fn search_availability() -> String {
    r#"<h1>Search for Availability</h1>
<form action="/search-availability" method="post" novalidate>
<label>Starting Date <input type="date" name="start" required></label>
<label>Ending Date <input type="date" name="end" required></label>
<button class="btn" type="submit">Search Availability</button>
</form>
"#
    .to_string()
}

fn choose_room(data: &TemplateData) -> String {
    let items: String = data
        .rooms
        .iter()
        .map(|room| {
            format!(
                "<li><a href=\"/choose-room/{}\">{}</a></li>\n",
                room.id,
                escape(&room.room_name)
            )
        })
        .collect();
    format!("<h1>Choose a Room</h1>\n<ul>\n{items}</ul>\n")
}

fn stay_dates(data: &TemplateData) -> (String, String) {
    let pick = |key: &str, fallback: Option<NaiveDate>| {
        let value = data.string(key);
        if value.is_empty() {
            fallback
                .map(|d| d.format(DATE_LAYOUT).to_string())
                .unwrap_or_default()
        } else {
            value.to_owned()
        }
    };
    let res = data.reservation.as_ref();
    (
        pick("start_date", res.map(|r| r.start_date)),
        pick("end_date", res.map(|r| r.end_date)),
    )
}

fn input(form: &Form, name: &str, label: &str, kind: &str, value: &str) -> String {
    let error = form
        .errors
        .get(name)
        .map(|e| format!("<div class=\"field-error\">{}</div>\n", escape(e)))
        .unwrap_or_default();
    let invalid = if form.errors.get(name).is_some() {
        " aria-invalid=\"true\""
    } else {
        ""
    };
    format!(
        "<p><label>{label} <input type=\"{kind}\" name=\"{name}\" value=\"{}\"{invalid}></label></p>\n{error}",
        escape(value)
    )
}

fn make_reservation(data: &TemplateData) -> String {
    let (start, end) = stay_dates(data);
    let (first, last, email, phone, room) = match &data.reservation {
        Some(r) => (
            r.first_name.as_str(),
            r.last_name.as_str(),
            r.email.as_str(),
            r.phone.as_str(),
            r.room_name(),
        ),
        None => ("", "", "", "", ""),
    };
    let form = &data.form;
    format!(
        r#"<h1>Make Reservation</h1>
<p><strong>Reservation Details</strong><br>
Room: {room}<br>
Arrival: {start}<br>
Departure: {end}</p>
<form action="/make-reservation" method="post" novalidate>
{first}{last}{email}{phone}<button class="btn" type="submit">Make Reservation</button>
</form>
"#,
        room = escape(room),
        start = escape(&start),
        end = escape(&end),
        first = input(form, "first_name", "First Name", "text", first),
        last = input(form, "last_name", "Last Name", "text", last),
        email = input(form, "email", "Email", "email", email),
        phone = input(form, "phone", "Phone", "text", phone),
    )
}

fn reservation_summary(data: &TemplateData) -> String {
    let Some(res) = &data.reservation else {
        return "<h1>Reservation Summary</h1>\n".to_string();
    };
    let (start, end) = stay_dates(data);
    format!(
        r#"<h1>Reservation Summary</h1>
<table>
<tr><td>Name:</td><td>{first} {last}</td></tr>
<tr><td>Room:</td><td>{room}</td></tr>
<tr><td>Arrival:</td><td>{start}</td></tr>
<tr><td>Departure:</td><td>{end}</td></tr>
<tr><td>Email:</td><td>{email}</td></tr>
<tr><td>Phone:</td><td>{phone}</td></tr>
</table>
"#,
        first = escape(&res.first_name),
        last = escape(&res.last_name),
        room = escape(res.room_name()),
        start = escape(&start),
        end = escape(&end),
        email = escape(&res.email),
        phone = escape(&res.phone),
    )
}
