pub mod attendance;
pub mod auth;
pub mod config;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod salaries;

use chrono::NaiveDate;

use crate::error::ServiceError;

/// Dates cross the wire as `YYYY-MM-DD` strings; anything else is a 400.
pub(crate) fn parse_date(label: &str, value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::invalid(format!("Invalid {label}")))
}

#[cfg(test)]
mod tests {
    use super::parse_date;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("date", "2024-01-31").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn rejects_garbage_and_non_iso_formats() {
        assert!(parse_date("date", "31/01/2024").is_err());
        assert!(parse_date("pay date", "not-a-date").is_err());
        assert_eq!(
            parse_date("pay date", "nope").unwrap_err().to_string(),
            "Invalid pay date"
        );
    }
}
