//! Entities of the volunteering domain

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::identity::IdentityRef;

/// Timestamps are stored without an offset
pub type Timestamp = NaiveDateTime;

/// An identity-backed actor that owns events.
///
/// Organisations are created out of band and are read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: i64,
    /// Without an identity the organisation cannot authenticate
    pub identity: Option<IdentityRef>,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_contact: Option<String>,
    pub email_contact: Option<String>,
}

/// An identity-backed participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub identity: Option<IdentityRef>,
    pub name: String,
    pub age: Option<i32>,
    pub email_contact: Option<String>,
    pub phone_contact: Option<String>,
    pub join_date: Option<Timestamp>,
    /// Unordered skill tags; `None` when never recorded
    pub skills: Option<Vec<String>>,
}

/// A volunteering event owned by exactly one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub address: Option<String>,
    pub organisation_id: i64,
    /// Ids of participating users
    pub participants: BTreeSet<i64>,
}

impl Event {
    /// Check the event invariants
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_event(&self.name, self.start_datetime, self.end_datetime)
    }

    /// An event has ended once its end time is at or before `now`.
    ///
    /// Events without an end time have not ended.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        matches!(self.end_datetime, Some(end) if end <= now)
    }
}

/// Fields of an event that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub address: Option<String>,
    pub organisation_id: i64,
}

impl NewEvent {
    /// Check the event invariants before insertion
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_event(&self.name, self.start_datetime, self.end_datetime)
    }

    /// Materialise with a generated id and no participants
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
            address: self.address,
            organisation_id: self.organisation_id,
            participants: BTreeSet::new(),
        }
    }
}

fn validate_event(
    name: &str,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::unprocessable("event name is required"));
    }
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            return Err(CoreError::unprocessable(
                "end_datetime must be later than start_datetime",
            ));
        }
    }
    Ok(())
}

/// Parse a timestamp as accepted by the API.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.f]`, the same with a space separator, and
/// RFC 3339 with an offset (normalised to UTC).
pub fn parse_timestamp(value: &str) -> Result<Timestamp, CoreError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|_| CoreError::unprocessable(format!("invalid datetime '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn event(start: Option<Timestamp>, end: Option<Timestamp>) -> Event {
        NewEvent {
            name: "beach clean-up".into(),
            description: None,
            start_datetime: start,
            end_datetime: end,
            address: None,
            organisation_id: 1,
        }
        .into_event(1)
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(event(Some(at(12, 10)), Some(at(12, 12))).validate().is_ok());
        assert!(event(Some(at(12, 12)), Some(at(12, 10))).validate().is_err());
        // Equal instants are rejected too
        assert!(event(Some(at(12, 10)), Some(at(12, 10))).validate().is_err());
    }

    #[test]
    fn test_open_ended_events_are_valid() {
        assert!(event(None, None).validate().is_ok());
        assert!(event(Some(at(12, 10)), None).validate().is_ok());
        assert!(event(None, Some(at(12, 10))).validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut e = event(None, None);
        e.name = "  ".into();
        assert!(matches!(e.validate(), Err(CoreError::Unprocessable(_))));
    }

    #[test]
    fn test_has_ended() {
        let e = event(Some(at(12, 10)), Some(at(12, 12)));
        assert!(e.has_ended(at(12, 12)));
        assert!(e.has_ended(at(13, 0)));
        assert!(!e.has_ended(at(12, 11)));
        assert!(!event(Some(at(12, 10)), None).has_ended(at(31, 0)));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2021-01-12T10:00:00").unwrap(), at(12, 10));
        assert_eq!(parse_timestamp("2021-01-12 10:00:00").unwrap(), at(12, 10));
        assert_eq!(parse_timestamp("2021-01-12T10:00").unwrap(), at(12, 10));
        assert_eq!(parse_timestamp("2021-01-12T11:00:00+01:00").unwrap(), at(12, 10));
        assert!(parse_timestamp("12/01/2021").is_err());
    }

    #[test]
    fn test_timestamp_serialises_iso() {
        let json = serde_json::to_value(at(12, 10)).unwrap();
        assert_eq!(json, serde_json::json!("2021-01-12T10:00:00"));
    }
}
