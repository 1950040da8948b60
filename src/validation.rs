use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Required text field: present and non-blank after trimming.
pub fn required_text(field: &str, value: Option<&str>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::Validation(format!(
            "The field '{field}' is required"
        ))),
    }
}

/// Text that may be updated but never blanked out.
pub fn non_blank(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!(
            "The field '{field}' cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Optional free text: trimmed, with blank collapsing to NULL.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::Validation("Invalid date format. Use YYYY-MM-DD".to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| ApiError::Validation("Invalid time format. Use HH:MM".to_string()))
}

/// Birth dates are events that already happened.
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, ApiError> {
    let date = parse_date(value)?;
    if date > Local::now().date_naive() {
        return Err(ApiError::Validation(
            "Birth date cannot be a future date".to_string(),
        ));
    }
    Ok(date)
}

/// Appointment slots must land strictly after the current moment.
pub fn is_future_slot(date: NaiveDate, time: NaiveTime) -> bool {
    NaiveDateTime::new(date, time) > Local::now().naive_local()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value.trim() {
            "Scheduled" => Ok(AppointmentStatus::Scheduled),
            "Completed" => Ok(AppointmentStatus::Completed),
            "Cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ApiError::Validation(
                "Invalid status. Options: Scheduled, Completed, Cancelled".to_string(),
            )),
        }
    }
}

/// Distinguishes "field omitted" from "field explicitly null" in partial
/// updates. Wrap the field as `Option<Option<T>>` with
/// `#[serde(default, deserialize_with = "double_option")]`: the outer
/// `Option` is presence, the inner one the value.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", Some("  Ana ")).unwrap(), "Ana");
        assert!(required_text("name", Some("   ")).is_err());
        assert!(required_text("name", None).is_err());
    }

    #[test]
    fn non_blank_rejects_whitespace_only() {
        assert_eq!(non_blank("reason", " checkup ").unwrap(), "checkup");
        assert!(non_blank("reason", " ").is_err());
    }

    #[test]
    fn optional_text_collapses_blank_to_none() {
        assert_eq!(optional_text(Some(" a ".to_string())), Some("a".to_string()));
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert!(parse_date("2025-06-10").is_ok());
        assert!(parse_date("10/06/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn parse_time_accepts_hh_mm_only() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9:99").is_err());
        assert!(parse_time("morning").is_err());
    }

    #[test]
    fn birth_date_must_not_be_future() {
        let tomorrow = Local::now().date_naive() + Duration::days(1);
        assert!(parse_birth_date(&tomorrow.to_string()).is_err());
        assert!(parse_birth_date("2020-01-15").is_ok());
        // Today itself is allowed.
        let today = Local::now().date_naive();
        assert_eq!(parse_birth_date(&today.to_string()).unwrap(), today);
    }

    #[test]
    fn future_slot_is_strict() {
        let now = Local::now().naive_local();
        assert!(!is_future_slot(now.date(), now.time()));
        let past = now - Duration::hours(1);
        assert!(!is_future_slot(past.date(), past.time()));
        let ahead = now + Duration::hours(1);
        assert!(is_future_slot(ahead.date(), ahead.time()));
    }

    #[test]
    fn status_parse_round_trips() {
        assert_eq!(
            AppointmentStatus::parse("Completed").unwrap().as_str(),
            "Completed"
        );
        assert_eq!(AppointmentStatus::default().as_str(), "Scheduled");
        assert!(AppointmentStatus::parse("Pending").is_err());
    }

    #[test]
    fn double_option_separates_missing_from_null() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "double_option")]
            weight: Option<Option<f64>>,
        }

        let missing: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.weight, None);

        let null: Payload = serde_json::from_str(r#"{"weight": null}"#).unwrap();
        assert_eq!(null.weight, Some(None));

        let set: Payload = serde_json::from_str(r#"{"weight": 4.5}"#).unwrap();
        assert_eq!(set.weight, Some(Some(4.5)));
    }
}
