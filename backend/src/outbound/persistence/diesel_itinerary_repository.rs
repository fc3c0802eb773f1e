//! PostgreSQL-backed `ItineraryRepository`.
//!
//! Items are stored as a kind tag plus a JSON field map. The sort anchor is
//! copied into `itinerary_datetime` on every write so listings can order in
//! SQL. Rows are validated again on load; a row that no longer parses is
//! reported as corrupt rather than silently skipped.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{ItemCandidate, ItineraryPersistenceError, ItineraryRepository};
use crate::domain::{
    BookingUrl, ItemAccessFacts, ItemDetails, ItineraryItem, ItineraryItemId, ParticipantStatus,
    TripAccessFacts, TripId, UserId,
};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{ItineraryItemRow, ItineraryItemUpdate, NewItineraryItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::{itinerary_items, itinerary_participants, trip_participants, trips};

/// Diesel implementation of the itinerary repository port.
#[derive(Clone)]
pub struct DieselItineraryRepository {
    pool: DbPool,
}

impl DieselItineraryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItineraryPersistenceError {
    map_pool_error_with(error, ItineraryPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ItineraryPersistenceError {
    map_diesel_error_with(
        error,
        ItineraryPersistenceError::query,
        ItineraryPersistenceError::connection,
    )
}

fn row_to_item(row: ItineraryItemRow) -> Result<ItineraryItem, ItineraryPersistenceError> {
    let corrupt = |reason: String| {
        ItineraryPersistenceError::corrupt(format!("item {}: {reason}", row.id))
    };
    let Value::Object(fields) = &row.fields else {
        return Err(corrupt("fields are not a JSON object".to_owned()));
    };
    let details = ItemDetails::from_tagged_fields(&row.item_type, fields)
        .map_err(|err| corrupt(err.to_string()))?;
    let booking_url = row
        .booking_url
        .as_deref()
        .map(BookingUrl::new)
        .transpose()
        .map_err(|err| corrupt(err.to_string()))?;
    Ok(ItineraryItem {
        id: ItineraryItemId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        trip_id: row.trip_id.map(TripId::from_uuid),
        details,
        booking_reference: row.booking_reference,
        booking_url,
        notes: row.notes,
        raw_details: row.raw_details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn parse_status(raw: &str) -> Result<ParticipantStatus, ItineraryPersistenceError> {
    raw.parse().map_err(|err| {
        ItineraryPersistenceError::query(format!("invalid participant status in database: {err}"))
    })
}

/// Rows backing a candidate listing, read in one snapshot.
struct CandidateRows {
    items: Vec<ItineraryItemRow>,
    item_statuses: Vec<(Uuid, String)>,
    trip_owners: Vec<(Uuid, Uuid)>,
    trip_statuses: Vec<(Uuid, String)>,
}

impl CandidateRows {
    fn into_candidates(self) -> Result<Vec<ItemCandidate>, ItineraryPersistenceError> {
        let item_statuses = collect_statuses(self.item_statuses)?;
        let trip_statuses = collect_statuses(self.trip_statuses)?;
        let trip_facts: HashMap<Uuid, TripAccessFacts> = self
            .trip_owners
            .into_iter()
            .map(|(trip_id, owner_id)| {
                let facts = TripAccessFacts {
                    owner_id: UserId::from_uuid(owner_id),
                    status: trip_statuses.get(&trip_id).copied(),
                };
                (trip_id, facts)
            })
            .collect();

        self.items
            .into_iter()
            .map(|row| {
                let status = item_statuses.get(&row.id).copied();
                let trip = row.trip_id.and_then(|id| trip_facts.get(&id).copied());
                let item = row_to_item(row)?;
                Ok(ItemCandidate {
                    access: ItemAccessFacts {
                        owner_id: item.owner_id,
                        status,
                        trip,
                    },
                    item,
                })
            })
            .collect()
    }
}

fn collect_statuses(
    rows: Vec<(Uuid, String)>,
) -> Result<HashMap<Uuid, ParticipantStatus>, ItineraryPersistenceError> {
    rows.into_iter()
        .map(|(id, raw)| parse_status(&raw).map(|status| (id, status)))
        .collect()
}

#[async_trait]
impl ItineraryRepository for DieselItineraryRepository {
    async fn insert(&self, item: &ItineraryItem) -> Result<(), ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewItineraryItemRow {
            id: *item.id.as_uuid(),
            owner_id: *item.owner_id.as_uuid(),
            trip_id: item.trip_id.map(|id| *id.as_uuid()),
            item_type: item.kind().as_str(),
            fields: Value::Object(item.details.to_fields()),
            itinerary_datetime: Some(item.details.sort_timestamp()),
            booking_reference: item.booking_reference.as_deref(),
            booking_url: item.booking_url.as_ref().map(AsRef::as_ref),
            notes: item.notes.as_deref(),
            raw_details: item.raw_details.as_ref(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        };
        diesel::insert_into(itinerary_items::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        id: &ItineraryItemId,
    ) -> Result<Option<ItineraryItem>, ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItineraryItemRow> = itinerary_items::table
            .find(id.as_uuid())
            .select(ItineraryItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_item).transpose()
    }

    async fn update(&self, item: &ItineraryItem) -> Result<bool, ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ItineraryItemUpdate {
            trip_id: item.trip_id.map(|id| *id.as_uuid()),
            item_type: item.kind().as_str(),
            fields: Value::Object(item.details.to_fields()),
            itinerary_datetime: Some(item.details.sort_timestamp()),
            booking_reference: item.booking_reference.as_deref(),
            booking_url: item.booking_url.as_ref().map(AsRef::as_ref),
            notes: item.notes.as_deref(),
            raw_details: item.raw_details.as_ref(),
            updated_at: item.updated_at,
        };
        let updated = diesel::update(itinerary_items::table.find(item.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ItineraryItemId) -> Result<bool, ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let item_id = *id.as_uuid();
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        itinerary_participants::table
                            .filter(itinerary_participants::itinerary_item_id.eq(item_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(itinerary_items::table.find(item_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<ItineraryItem>, ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ItineraryItemRow> = itinerary_items::table
            .filter(itinerary_items::trip_id.eq(*trip.as_uuid()))
            .order((
                itinerary_items::itinerary_datetime.asc().nulls_last(),
                itinerary_items::created_at.asc(),
                itinerary_items::id.asc(),
            ))
            .select(ItineraryItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_item).collect()
    }

    async fn list_candidates(
        &self,
        user: &UserId,
        trip: Option<TripId>,
    ) -> Result<Vec<ItemCandidate>, ItineraryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let trip_filter = trip.map(|id| *id.as_uuid());

        // Read items and their access facts in one transaction so the facts
        // describe the same snapshot as the items.
        let rows = conn
            .transaction(|conn| {
                async move {
                    let owned_trips = trips::table
                        .filter(trips::owner_id.eq(user_id))
                        .select(trips::id.nullable());
                    let member_trips = trip_participants::table
                        .filter(trip_participants::user_id.eq(user_id))
                        .select(trip_participants::trip_id.nullable());
                    let shared_items = itinerary_participants::table
                        .filter(itinerary_participants::user_id.eq(user_id))
                        .select(itinerary_participants::itinerary_item_id);

                    let mut query = itinerary_items::table
                        .filter(
                            itinerary_items::owner_id
                                .eq(user_id)
                                .or(itinerary_items::trip_id.eq_any(owned_trips))
                                .or(itinerary_items::trip_id.eq_any(member_trips))
                                .or(itinerary_items::id.eq_any(shared_items)),
                        )
                        .into_boxed();
                    if let Some(trip_id) = trip_filter {
                        query = query.filter(itinerary_items::trip_id.eq(trip_id));
                    }
                    let items: Vec<ItineraryItemRow> = query
                        .order((
                            itinerary_items::itinerary_datetime.asc().nulls_last(),
                            itinerary_items::created_at.asc(),
                            itinerary_items::id.asc(),
                        ))
                        .select(ItineraryItemRow::as_select())
                        .load(conn)
                        .await?;

                    let item_ids: Vec<Uuid> = items.iter().map(|row| row.id).collect();
                    let trip_ids: Vec<Uuid> = items.iter().filter_map(|row| row.trip_id).collect();

                    let item_statuses: Vec<(Uuid, String)> = itinerary_participants::table
                        .filter(itinerary_participants::user_id.eq(user_id))
                        .filter(itinerary_participants::itinerary_item_id.eq_any(&item_ids))
                        .select((
                            itinerary_participants::itinerary_item_id,
                            itinerary_participants::status,
                        ))
                        .load(conn)
                        .await?;
                    let trip_owners: Vec<(Uuid, Uuid)> = trips::table
                        .filter(trips::id.eq_any(&trip_ids))
                        .select((trips::id, trips::owner_id))
                        .load(conn)
                        .await?;
                    let trip_statuses: Vec<(Uuid, String)> = trip_participants::table
                        .filter(trip_participants::user_id.eq(user_id))
                        .filter(trip_participants::trip_id.eq_any(&trip_ids))
                        .select((trip_participants::trip_id, trip_participants::status))
                        .load(conn)
                        .await?;

                    Ok(CandidateRows {
                        items,
                        item_statuses,
                        trip_owners,
                        trip_statuses,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        rows.into_candidates()
    }
}
