//! Domain types shared by the handlers, the session and the repository.

mod reservation;
mod room;
mod user;

pub use reservation::{Reservation, RestrictionKind, RoomRestriction};
pub use room::Room;
pub use user::User;

/// Date layout used on every form, query string and JSON payload.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date as submitted by the browser.
pub fn parse_date(value: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(value.trim(), DATE_LAYOUT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-12-31 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
