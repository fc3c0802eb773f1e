//! Reading and writing kind-specific fields as a JSON field map.
//!
//! Timestamps travel as RFC 3339 strings. Absent and `null` entries are
//! equivalent; optional fields that are absent stay unset.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Kind-specific fields keyed by snake_case field name.
pub type FieldMap = Map<String, Value>;

/// Validation failures raised while interpreting kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailsError {
    #[error("unknown itinerary item type: {value}")]
    UnknownItemType { value: String },
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("unexpected field for this item type: {field}")]
    UnexpectedField { field: String },
}

impl DetailsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error concerns one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownItemType { .. } => None,
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(*field),
            Self::UnexpectedField { field } => Some(field.as_str()),
        }
    }
}

pub(crate) struct FieldReader<'a> {
    fields: &'a FieldMap,
}

impl<'a> FieldReader<'a> {
    pub(crate) const fn new(fields: &'a FieldMap) -> Self {
        Self { fields }
    }

    /// Reject keys outside `allowed`.
    pub(crate) fn ensure_known(&self, allowed: &[&'static str]) -> Result<(), DetailsError> {
        match self.fields.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(DetailsError::UnexpectedField { field: key.clone() }),
            None => Ok(()),
        }
    }

    fn present(&self, field: &'static str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    pub(crate) fn text(&self, field: &'static str) -> Result<Option<String>, DetailsError> {
        let Some(value) = self.present(field) else {
            return Ok(None);
        };
        let raw = value
            .as_str()
            .ok_or_else(|| DetailsError::invalid(field, "must be a string"))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DetailsError::invalid(field, "must not be blank"));
        }
        Ok(Some(trimmed.to_owned()))
    }

    pub(crate) fn required_text(&self, field: &'static str) -> Result<String, DetailsError> {
        self.text(field)?
            .ok_or(DetailsError::MissingField { field })
    }

    pub(crate) fn timestamp(
        &self,
        field: &'static str,
    ) -> Result<Option<DateTime<Utc>>, DetailsError> {
        let Some(value) = self.present(field) else {
            return Ok(None);
        };
        let raw = value
            .as_str()
            .ok_or_else(|| DetailsError::invalid(field, "must be an RFC 3339 timestamp string"))?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|err| {
                DetailsError::invalid(field, format!("must be an RFC 3339 timestamp: {err}"))
            })
    }

    pub(crate) fn required_timestamp(
        &self,
        field: &'static str,
    ) -> Result<DateTime<Utc>, DetailsError> {
        self.timestamp(field)?
            .ok_or(DetailsError::MissingField { field })
    }

    /// Three-letter IATA airport code, normalised to upper case.
    pub(crate) fn airport_code(&self, field: &'static str) -> Result<String, DetailsError> {
        let code = self.required_text(field)?;
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(code.to_ascii_uppercase())
        } else {
            Err(DetailsError::invalid(field, "must be a three-letter airport code"))
        }
    }
}

/// Reject an interval whose end precedes its start.
pub(crate) fn ensure_ordered(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_field: &'static str,
    end_field: &'static str,
) -> Result<(), DetailsError> {
    if end < start {
        Err(DetailsError::invalid(
            end_field,
            format!("must not precede {start_field}"),
        ))
    } else {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FieldWriter {
    fields: FieldMap,
}

impl FieldWriter {
    pub(crate) fn text(mut self, field: &'static str, value: &str) -> Self {
        self.fields
            .insert(field.to_owned(), Value::String(value.to_owned()));
        self
    }

    pub(crate) fn optional_text(self, field: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(text) => self.text(field, text),
            None => self,
        }
    }

    pub(crate) fn timestamp(mut self, field: &'static str, value: DateTime<Utc>) -> Self {
        self.fields.insert(
            field.to_owned(),
            Value::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
        self
    }

    pub(crate) fn optional_timestamp(
        self,
        field: &'static str,
        value: Option<DateTime<Utc>>,
    ) -> Self {
        match value {
            Some(at) => self.timestamp(field, at),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> FieldMap {
        self.fields
    }
}
