//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them to
//! domain types and back.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{itinerary_items, itinerary_participants, trip_participants, trips, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub picture_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_subject_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable user. `password_hash` is left to its column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub picture_url: Option<&'a str>,
    pub oauth_provider: Option<&'a str>,
    pub oauth_subject_id: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable trip columns. `None` writes NULL so cleared fields stay cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trips)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TripUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_participants)]
pub(crate) struct NewTripParticipantRow<'a> {
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = itinerary_participants)]
pub(crate) struct NewItineraryParticipantRow<'a> {
    pub itinerary_item_id: Uuid,
    pub user_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant status joined with the participant's profile.
pub(crate) type ParticipantListingRow = (String, DateTime<Utc>, DateTime<Utc>, UserSummaryRow);

/// Outstanding invitation joined with the resource title and its owner.
pub(crate) type PendingInvitationRow = (Uuid, String, DateTime<Utc>, UserSummaryRow);

/// Profile columns shown in participant and invitation listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserSummaryRow {
    pub id: Uuid,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
}

// ---------------------------------------------------------------------------
// Itinerary items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = itinerary_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItineraryItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub trip_id: Option<Uuid>,
    pub item_type: String,
    pub fields: Value,
    pub booking_reference: Option<String>,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
    pub raw_details: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = itinerary_items)]
pub(crate) struct NewItineraryItemRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub trip_id: Option<Uuid>,
    pub item_type: &'a str,
    pub fields: Value,
    pub itinerary_datetime: Option<DateTime<Utc>>,
    pub booking_reference: Option<&'a str>,
    pub booking_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub raw_details: Option<&'a Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable item columns. `None` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = itinerary_items)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ItineraryItemUpdate<'a> {
    pub trip_id: Option<Uuid>,
    pub item_type: &'a str,
    pub fields: Value,
    pub itinerary_datetime: Option<DateTime<Utc>>,
    pub booking_reference: Option<&'a str>,
    pub booking_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub raw_details: Option<&'a Value>,
    pub updated_at: DateTime<Utc>,
}
