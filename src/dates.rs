use time::{format_description::FormatItem, macros::format_description, Date};

use crate::errors::ApiError;

const DATE_FMT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` query/body value.
pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DATE_FMT)
        .map_err(|_| ApiError::bad_request(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

pub fn format_date(d: Date) -> String {
    // The format has no invalid combinations for a valid Date
    d.format(DATE_FMT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_and_formats_iso_dates() {
        assert_eq!(parse_date("2025-06-01").unwrap(), date!(2025 - 06 - 01));
        assert_eq!(format_date(date!(2025 - 06 - 01)), "2025-06-01");
        assert!(parse_date("01.06.2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
