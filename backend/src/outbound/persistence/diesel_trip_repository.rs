//! PostgreSQL-backed `TripRepository`.
//!
//! Deleting a trip removes its participant rows and detaches its itinerary
//! items in one transaction, so no reader observes a half-deleted trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TripPersistenceError, TripRepository};
use crate::domain::{Trip, TripId, TripName, UserId};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{NewTripRow, TripRow, TripUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{itinerary_items, trip_participants, trips};

/// Diesel implementation of the trip repository port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TripPersistenceError {
    map_pool_error_with(error, TripPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TripPersistenceError {
    map_diesel_error_with(
        error,
        TripPersistenceError::query,
        TripPersistenceError::connection,
    )
}

fn row_to_trip(row: TripRow) -> Result<Trip, TripPersistenceError> {
    let name = TripName::new(&row.name).map_err(|err| {
        TripPersistenceError::query(format!("invalid trip name in database: {err}"))
    })?;
    Ok(Trip {
        id: TripId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name,
        description: row.description,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewTripRow {
            id: *trip.id.as_uuid(),
            owner_id: *trip.owner_id.as_uuid(),
            name: trip.name.as_str(),
            description: trip.description.as_deref(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        };
        diesel::insert_into(trips::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TripRow> = trips::table
            .find(id.as_uuid())
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_trip).transpose()
    }

    async fn update(&self, trip: &Trip) -> Result<bool, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TripUpdate {
            name: trip.name.as_str(),
            description: trip.description.as_deref(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            updated_at: trip.updated_at,
        };
        let updated = diesel::update(trips::table.find(trip.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let trip_id = *id.as_uuid();
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::update(
                        itinerary_items::table.filter(itinerary_items::trip_id.eq(trip_id)),
                    )
                    .set(itinerary_items::trip_id.eq(None::<Uuid>))
                    .execute(conn)
                    .await?;
                    diesel::delete(
                        trip_participants::table.filter(trip_participants::trip_id.eq(trip_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(trips::table.find(trip_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let shared = trip_participants::table
            .filter(trip_participants::user_id.eq(user_id))
            .select(trip_participants::trip_id);
        let rows: Vec<TripRow> = trips::table
            .filter(trips::owner_id.eq(user_id).or(trips::id.eq_any(shared)))
            .order((
                trips::start_date.asc().nulls_last(),
                trips::created_at.asc(),
                trips::id.asc(),
            ))
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_trip).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn blank_names_in_storage_are_reported() {
        let at = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let row = TripRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "   ".to_owned(),
            description: None,
            start_date: None,
            end_date: None,
            created_at: at,
            updated_at: at,
        };
        let error = row_to_trip(row).expect_err("blank name");
        assert!(error.to_string().contains("invalid trip name"));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        ));
        assert!(matches!(error, TripPersistenceError::Connection { .. }));
    }
}
