//! Trips owned by a user and shared with invited participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TripId, UserId};
use super::ordering::{Chronological, SortKey};
use super::timestamps::at_storage_precision;

/// Maximum trip name length in characters.
pub const TRIP_NAME_MAX: usize = 200;

/// Validation errors for trip fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("trip name must not be empty")]
    EmptyName,
    #[error("trip name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("trip end date must not precede its start date")]
    EndBeforeStart,
}

/// Display name of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripName(String);

impl TripName {
    /// Validate a trip name, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TripValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TripValidationError::EmptyName);
        }
        if trimmed.chars().count() > TRIP_NAME_MAX {
            return Err(TripValidationError::NameTooLong { max: TRIP_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TripName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TripName {
    type Error = TripValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TripName> for String {
    fn from(value: TripName) -> Self {
        value.0
    }
}

/// Optional date window of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TripSchedule {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TripSchedule {
    /// Validate that `end` does not precede `start` when both are present.
    /// Both bounds are kept at storage precision.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TripValidationError> {
        if let (Some(start_at), Some(end_at)) = (start, end) {
            if end_at < start_at {
                return Err(TripValidationError::EndBeforeStart);
            }
        }
        Ok(Self {
            start: start.map(at_storage_precision),
            end: end.map(at_storage_precision),
        })
    }

    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}

/// A persisted trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    /// Creator and sole owner.
    pub owner_id: UserId,
    pub name: TripName,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Build a new trip from validated input.
    #[must_use]
    pub fn create(id: TripId, owner_id: UserId, draft: TripDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: draft.name,
            description: draft.description,
            start_date: draft.schedule.start(),
            end_date: draft.schedule.end(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    #[must_use]
    pub fn schedule(&self) -> TripSchedule {
        TripSchedule {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Apply a partial update, re-validating the resulting date window.
    pub fn apply(
        &mut self,
        patch: TripPatch,
        now: DateTime<Utc>,
    ) -> Result<(), TripValidationError> {
        let schedule = TripSchedule::new(
            patch.start_date.unwrap_or(self.start_date),
            patch.end_date.unwrap_or(self.end_date),
        )?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.start_date = schedule.start();
        self.end_date = schedule.end();
        self.updated_at = now;
        Ok(())
    }

    /// Whether the trip starts at or after `now`. Undated trips never qualify.
    #[must_use]
    pub fn starts_on_or_after(&self, now: DateTime<Utc>) -> bool {
        self.start_date.is_some_and(|start| start >= now)
    }
}

impl Chronological for Trip {
    fn sort_key(&self) -> SortKey {
        SortKey {
            anchor: self.start_date,
            created_at: self.created_at,
            id: *self.id.as_uuid(),
        }
    }
}

/// Validated input for creating a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub name: TripName,
    pub description: Option<String>,
    pub schedule: TripSchedule,
}

/// Partial trip update. Outer `None` leaves a field unchanged; for nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripPatch {
    pub name: Option<TripName>,
    pub description: Option<Option<String>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}
