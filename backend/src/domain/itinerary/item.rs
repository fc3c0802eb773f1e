//! Itinerary item aggregate.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::details::ItemDetails;
use super::fields::{DetailsError, FieldMap};
use super::kind::ItemKind;
use crate::domain::ids::{ItineraryItemId, TripId, UserId};
use crate::domain::ordering::{Chronological, SortKey};

/// Validation errors for itinerary items.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    #[error(transparent)]
    Details(#[from] DetailsError),
    #[error("booking URL must be an absolute http or https URL")]
    InvalidBookingUrl,
}

/// Absolute `http`/`https` booking link.
///
/// # Examples
/// ```
/// use tripshare::domain::BookingUrl;
///
/// assert!(BookingUrl::new("https://example.com/booking/42").is_ok());
/// assert!(BookingUrl::new("ftp://example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingUrl(String);

impl BookingUrl {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = raw.as_ref().trim();
        let parsed = url::Url::parse(trimmed).map_err(|_| ItemValidationError::InvalidBookingUrl)?;
        match parsed.scheme() {
            "http" | "https" if parsed.has_host() => Ok(Self(trimmed.to_owned())),
            _ => Err(ItemValidationError::InvalidBookingUrl),
        }
    }
}

impl AsRef<str> for BookingUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persisted itinerary item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryItem {
    pub id: ItineraryItemId,
    pub owner_id: UserId,
    /// Trip the item is attached to. Standalone items have none.
    pub trip_id: Option<TripId>,
    pub details: ItemDetails,
    pub booking_reference: Option<String>,
    pub booking_url: Option<BookingUrl>,
    pub notes: Option<String>,
    /// Provider payload kept verbatim, e.g. a parsed confirmation email.
    pub raw_details: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItineraryItem {
    #[must_use]
    pub fn create(
        id: ItineraryItemId,
        owner_id: UserId,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            trip_id: draft.trip_id,
            details: draft.details,
            booking_reference: draft.booking_reference,
            booking_url: draft.booking_url,
            notes: draft.notes,
            raw_details: draft.raw_details,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Apply a partial update.
    ///
    /// When the kind is unchanged the supplied fields are merged over the
    /// current ones, with `null` removing a field. A kind change replaces the
    /// fields wholesale. Either way the result is validated again.
    pub fn apply(
        &mut self,
        patch: ItemPatch,
        now: DateTime<Utc>,
    ) -> Result<(), ItemValidationError> {
        let details = match (patch.kind, patch.fields) {
            (Some(kind), fields) if kind != self.kind() => {
                Some(ItemDetails::from_fields(kind, &fields.unwrap_or_default())?)
            }
            (_, Some(fields)) => {
                let mut merged = self.details.to_fields();
                for (key, value) in fields {
                    if value.is_null() {
                        merged.remove(&key);
                    } else {
                        merged.insert(key, value);
                    }
                }
                Some(ItemDetails::from_fields(self.kind(), &merged)?)
            }
            (_, None) => None,
        };

        if let Some(details) = details {
            self.details = details;
        }
        if let Some(trip_id) = patch.trip_id {
            self.trip_id = Some(trip_id);
        }
        if let Some(reference) = patch.booking_reference {
            self.booking_reference = reference;
        }
        if let Some(url) = patch.booking_url {
            self.booking_url = url;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(raw) = patch.raw_details {
            self.raw_details = raw;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Chronological for ItineraryItem {
    fn sort_key(&self) -> SortKey {
        SortKey {
            anchor: Some(self.details.sort_timestamp()),
            created_at: self.created_at,
            id: *self.id.as_uuid(),
        }
    }
}

/// Validated input for creating an itinerary item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub trip_id: Option<TripId>,
    pub details: ItemDetails,
    pub booking_reference: Option<String>,
    pub booking_url: Option<BookingUrl>,
    pub notes: Option<String>,
    pub raw_details: Option<Value>,
}

/// Partial itinerary item update. For nullable fields `Some(None)` clears the
/// value. The trip link can be set or moved but not removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPatch {
    pub trip_id: Option<TripId>,
    pub kind: Option<ItemKind>,
    pub fields: Option<FieldMap>,
    pub booking_reference: Option<Option<String>>,
    pub booking_url: Option<Option<BookingUrl>>,
    pub notes: Option<Option<String>>,
    pub raw_details: Option<Option<Value>>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 2, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn stay() -> ItineraryItem {
        let details = ItemDetails::from_fields(
            ItemKind::Accommodation,
            &fields(json!({
                "address": "Rua Augusta 10",
                "check_in_datetime": "2025-07-02T15:00:00Z",
                "check_out_datetime": "2025-07-05T11:00:00Z",
            })),
        )
        .expect("valid accommodation");
        let draft = ItemDraft {
            trip_id: None,
            details,
            booking_reference: Some("ABC123".to_owned()),
            booking_url: None,
            notes: None,
            raw_details: None,
        };
        ItineraryItem::create(ItineraryItemId::random(), UserId::random(), draft, at(8))
    }

    #[rstest]
    #[case("https://example.com/b/1", true)]
    #[case("http://example.com", true)]
    #[case("mailto:ops@example.com", false)]
    #[case("not a url", false)]
    #[case("file:///etc/passwd", false)]
    fn booking_urls(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(BookingUrl::new(raw).is_ok(), valid);
    }

    #[test]
    fn same_kind_patch_merges_fields() {
        let mut item = stay();
        let patch = ItemPatch {
            fields: Some(fields(json!({"check_out_datetime": "2025-07-06T11:00:00Z"}))),
            booking_reference: Some(None),
            ..ItemPatch::default()
        };
        item.apply(patch, at(9)).expect("valid patch");
        let ItemDetails::Accommodation(details) = &item.details else {
            panic!("kind must be preserved");
        };
        assert_eq!(details.address, "Rua Augusta 10");
        assert_eq!(
            details.check_out_datetime.to_rfc3339(),
            "2025-07-06T11:00:00+00:00"
        );
        assert_eq!(item.booking_reference, None);
        assert_eq!(item.updated_at, at(9));
    }

    #[test]
    fn kind_change_requires_a_complete_field_set() {
        let mut item = stay();
        let before = item.clone();
        let patch = ItemPatch {
            kind: Some(ItemKind::Activity),
            fields: Some(fields(json!({"description": "Tram 28"}))),
            ..ItemPatch::default()
        };
        let error = item.apply(patch, at(9)).expect_err("start is missing");
        assert_eq!(
            error,
            ItemValidationError::Details(DetailsError::MissingField {
                field: "start_datetime"
            })
        );
        assert_eq!(item, before);
    }

    #[test]
    fn kind_change_replaces_details() {
        let mut item = stay();
        let patch = ItemPatch {
            kind: Some(ItemKind::Activity),
            fields: Some(fields(json!({"start_datetime": "2025-07-03T10:00:00Z"}))),
            ..ItemPatch::default()
        };
        item.apply(patch, at(9)).expect("valid patch");
        assert_eq!(item.kind(), ItemKind::Activity);
        assert_eq!(item.sort_key().anchor, Some(at(10) + chrono::Duration::days(1)));
    }

    #[test]
    fn removing_a_required_field_fails() {
        let mut item = stay();
        let patch = ItemPatch {
            fields: Some(fields(json!({"address": null}))),
            ..ItemPatch::default()
        };
        assert!(item.apply(patch, at(9)).is_err());
    }
}
