//! Allow-listed request fields for event creation and partial update
//!
//! Every accepted key is named here and validated on its own. Keys outside the
//! allow-list are rejected instead of being assigned blindly.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{parse_timestamp, Event, NewEvent, Timestamp};

/// Keys accepted when creating an event
pub const CREATE_FIELDS: &[&str] = &[
    "name",
    "description",
    "start_datetime",
    "end_datetime",
    "address",
    "organisation_id",
];

/// Keys accepted when patching an event. The owning organisation is fixed at
/// creation and is deliberately absent.
pub const UPDATE_FIELDS: &[&str] = &[
    "name",
    "description",
    "start_datetime",
    "end_datetime",
    "address",
];

/// Read the owning organisation id from a create body.
///
/// Used before the rest of the body is parsed so the organisation can be
/// loaded and its ownership checked first.
pub fn organisation_id(body: &Map<String, Value>) -> Result<i64, CoreError> {
    match body.get("organisation_id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| CoreError::unprocessable("organisation_id must be an integer")),
        Some(Value::Null) | None => Err(CoreError::unprocessable("organisation_id is required")),
        Some(_) => Err(CoreError::unprocessable("organisation_id must be an integer")),
    }
}

/// Parse a create body into a [`NewEvent`] and check its invariants
pub fn parse_new_event(body: &Map<String, Value>) -> Result<NewEvent, CoreError> {
    reject_unknown(body, CREATE_FIELDS)?;

    let name = match body.get("name") {
        Some(value) => required_string("name", value)?,
        None => return Err(CoreError::unprocessable("name is required")),
    };

    let event = NewEvent {
        name,
        description: optional_field(body, "description", optional_string)?,
        start_datetime: optional_field(body, "start_datetime", optional_timestamp)?,
        end_datetime: optional_field(body, "end_datetime", optional_timestamp)?,
        address: optional_field(body, "address", optional_string)?,
        organisation_id: organisation_id(body)?,
    };
    event.validate()?;
    Ok(event)
}

/// A partial update. The outer `Option` says whether the key was present; the
/// inner one whether it was set to `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub start_datetime: Option<Option<Timestamp>>,
    pub end_datetime: Option<Option<Timestamp>>,
    pub address: Option<Option<String>>,
}

impl EventPatch {
    /// Parse a patch body against [`UPDATE_FIELDS`]
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, CoreError> {
        reject_unknown(body, UPDATE_FIELDS)?;

        Ok(Self {
            name: body
                .get("name")
                .map(|value| required_string("name", value))
                .transpose()?,
            description: body
                .get("description")
                .map(|value| optional_string("description", value))
                .transpose()?,
            start_datetime: body
                .get("start_datetime")
                .map(|value| optional_timestamp("start_datetime", value))
                .transpose()?,
            end_datetime: body
                .get("end_datetime")
                .map(|value| optional_timestamp("end_datetime", value))
                .transpose()?,
            address: body
                .get("address")
                .map(|value| optional_string("address", value))
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to a copy of `event` and re-check the invariants on the result
    pub fn apply(&self, event: &Event) -> Result<Event, CoreError> {
        let mut updated = event.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(start) = self.start_datetime {
            updated.start_datetime = start;
        }
        if let Some(end) = self.end_datetime {
            updated.end_datetime = end;
        }
        if let Some(address) = &self.address {
            updated.address = address.clone();
        }
        updated.validate()?;
        Ok(updated)
    }
}

fn reject_unknown(body: &Map<String, Value>, allowed: &[&str]) -> Result<(), CoreError> {
    match body.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(CoreError::unprocessable(format!(
            "field '{}' cannot be set",
            key
        ))),
        None => Ok(()),
    }
}

fn optional_field<T>(
    body: &Map<String, Value>,
    key: &str,
    parse: fn(&str, &Value) -> Result<Option<T>, CoreError>,
) -> Result<Option<T>, CoreError> {
    match body.get(key) {
        Some(value) => parse(key, value),
        None => Ok(None),
    }
}

fn required_string(key: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) | Value::Null => {
            Err(CoreError::unprocessable(format!("{} is required", key)))
        }
        _ => Err(CoreError::unprocessable(format!("{} must be a string", key))),
    }
}

fn optional_string(key: &str, value: &Value) -> Result<Option<String>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(CoreError::unprocessable(format!("{} must be a string", key))),
    }
}

fn optional_timestamp(key: &str, value: &Value) -> Result<Option<Timestamp>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => parse_timestamp(s).map(Some),
        _ => Err(CoreError::unprocessable(format!(
            "{} must be a datetime string",
            key
        ))),
    }
}
