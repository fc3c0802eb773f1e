//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{EmailAddress, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidEmail,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidEmail => "invalid_email",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

pub(crate) fn parse_email(value: String, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(&value).map_err(|error| {
        ValidationError::new(field.as_str(), error.to_string())
            .with_value(ErrorCode::InvalidEmail, value)
    })
}

/// Deserialise a field that distinguishes "absent" from explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: an absent
/// field stays `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        notes: Option<Option<String>>,
    }

    #[rstest]
    #[case(json!({}), None)]
    #[case(json!({"notes": null}), Some(None))]
    #[case(json!({"notes": "bring adapters"}), Some(Some("bring adapters".to_owned())))]
    fn nullable_distinguishes_absent_from_null(
        #[case] body: Value,
        #[case] expected: Option<Option<String>>,
    ) {
        let patch: Patch = serde_json::from_value(body).expect("valid patch");
        assert_eq!(patch.notes, expected);
    }

    #[test]
    fn invalid_uuid_reports_field_and_value() {
        let error = parse_uuid("nope".to_owned(), FieldName::new("tripId")).expect_err("invalid");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "tripId", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    #[case("2025-03-01T10:00:00Z", true)]
    #[case("2025-03-01T10:00:00+02:00", true)]
    #[case("2025-03-01", false)]
    #[case("yesterday", false)]
    fn timestamps_must_be_rfc3339(#[case] raw: &str, #[case] valid: bool) {
        let parsed = parse_rfc3339_timestamp(raw.to_owned(), FieldName::new("startDate"));
        assert_eq!(parsed.is_ok(), valid);
    }

    #[test]
    fn malformed_email_is_an_invalid_request() {
        let error = parse_email("ada".to_owned(), FieldName::new("email")).expect_err("invalid");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|details| details.get("code")),
            Some(&json!("invalid_email"))
        );
    }

    #[test]
    fn missing_field_names_the_field() {
        let error = missing_field_error(FieldName::new("name"));
        assert_eq!(
            error.details(),
            Some(&json!({"field": "name", "code": "missing_field"}))
        );
    }
}
