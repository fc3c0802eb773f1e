//! Builders for domain values used across unit and integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use crate::domain::{
    EmailAddress, FieldMap, ItemDetails, ItemDraft, ItemKind, ItineraryItem, ItineraryItemId,
    NewUser, OAuthLink, Trip, TripDraft, TripId, TripName, TripSchedule, User, UserId, UserStatus,
    VerifiedIdentity,
};

/// Instant on 2025-06-`day` at `hour`:00 UTC.
///
/// # Panics
/// Panics when the day or hour is out of range.
#[must_use]
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Default "now" for fixture clocks.
#[must_use]
pub fn fixture_timestamp() -> DateTime<Utc> {
    at(1, 12)
}

/// Unwrap a JSON object literal into a field map.
///
/// # Panics
/// Panics when `value` is not an object.
#[must_use]
pub fn field_map(value: serde_json::Value) -> FieldMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// # Panics
/// Panics when the name or dates are invalid.
#[must_use]
pub fn trip_draft(
    name: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> TripDraft {
    TripDraft {
        name: TripName::new(name).expect("valid trip name"),
        description: None,
        schedule: TripSchedule::new(start, end).expect("valid schedule"),
    }
}

#[must_use]
pub fn trip_owned_by(owner: UserId, start: Option<DateTime<Utc>>) -> Trip {
    Trip::create(
        TripId::random(),
        owner,
        trip_draft("Fixture trip", start, None),
        fixture_timestamp(),
    )
}

/// Two-night stay checking in at `check_in`.
///
/// # Panics
/// Panics if the generated fields fail validation.
#[must_use]
pub fn accommodation_details(check_in: DateTime<Utc>) -> ItemDetails {
    let check_out = check_in + Duration::days(2);
    ItemDetails::from_fields(
        ItemKind::Accommodation,
        &field_map(json!({
            "address": "Rua Augusta 10, Lisbon",
            "check_in_datetime": check_in.to_rfc3339(),
            "check_out_datetime": check_out.to_rfc3339(),
        })),
    )
    .expect("valid accommodation")
}

/// Activity starting at `start`.
///
/// # Panics
/// Panics if the generated fields fail validation.
#[must_use]
pub fn activity_details(start: DateTime<Utc>) -> ItemDetails {
    ItemDetails::from_fields(
        ItemKind::Activity,
        &field_map(json!({
            "description": "Walking tour",
            "start_datetime": start.to_rfc3339(),
        })),
    )
    .expect("valid activity")
}

#[must_use]
pub fn item_draft(trip_id: Option<TripId>, details: ItemDetails) -> ItemDraft {
    ItemDraft {
        trip_id,
        details,
        booking_reference: None,
        booking_url: None,
        notes: None,
        raw_details: None,
    }
}

#[must_use]
pub fn item_owned_by(
    owner: UserId,
    trip_id: Option<TripId>,
    details: ItemDetails,
) -> ItineraryItem {
    ItineraryItem::create(
        ItineraryItemId::random(),
        owner,
        item_draft(trip_id, details),
        fixture_timestamp(),
    )
}

/// # Panics
/// Panics when `email` is not a valid address.
#[must_use]
pub fn verified_identity(email: &str) -> VerifiedIdentity {
    let email = EmailAddress::new(email).expect("valid fixture email");
    let local = email
        .as_str()
        .split('@')
        .next()
        .unwrap_or_default()
        .to_owned();
    VerifiedIdentity {
        subject_id: format!("sub-{local}"),
        email,
        email_verified: true,
        given_name: Some(local),
        family_name: Some("Fixture".to_owned()),
        picture_url: None,
        provider: "google".to_owned(),
    }
}

/// Registration payload matching [`verified_identity`].
#[must_use]
pub fn new_user(email: &str) -> NewUser {
    let identity = verified_identity(email);
    NewUser {
        id: UserId::random(),
        email: identity.email,
        given_name: identity.given_name.unwrap_or_default(),
        family_name: identity.family_name.unwrap_or_default(),
        picture_url: None,
        oauth: Some(OAuthLink {
            provider: identity.provider,
            subject_id: identity.subject_id,
        }),
        status: UserStatus::Active,
        created_at: fixture_timestamp(),
    }
}

/// Persisted user matching [`new_user`].
#[must_use]
pub fn user(email: &str) -> User {
    let draft = new_user(email);
    User {
        id: draft.id,
        email: draft.email,
        given_name: draft.given_name,
        family_name: draft.family_name,
        picture_url: draft.picture_url,
        oauth: draft.oauth,
        status: draft.status,
        created_at: draft.created_at,
        updated_at: draft.created_at,
    }
}
