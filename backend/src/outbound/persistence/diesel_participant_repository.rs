//! PostgreSQL-backed `ParticipantRepository`.
//!
//! Trip and itinerary item participants live in separate tables with the
//! same shape; every operation dispatches on [`SharedResource`]. The composite
//! primary key on each table serialises concurrent invitations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ParticipantPersistenceError, ParticipantRepository};
use crate::domain::{
    EmailAddress, ItineraryItemId, Participant, ParticipantStatus, Participation,
    PendingInvitation, SharedResource, TripId, UserId, UserSummary,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error_with, map_pool_error_with};
use super::models::{
    NewItineraryParticipantRow, NewTripParticipantRow, ParticipantListingRow,
    PendingInvitationRow, UserSummaryRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{itinerary_items, itinerary_participants, trip_participants, trips, users};

/// Diesel implementation of the participant repository port.
#[derive(Clone)]
pub struct DieselParticipantRepository {
    pool: DbPool,
}

impl DieselParticipantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParticipantPersistenceError {
    map_pool_error_with(error, ParticipantPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ParticipantPersistenceError {
    map_diesel_error_with(
        error,
        ParticipantPersistenceError::query,
        ParticipantPersistenceError::connection,
    )
}

fn parse_status(raw: &str) -> Result<ParticipantStatus, ParticipantPersistenceError> {
    raw.parse().map_err(|err| {
        ParticipantPersistenceError::query(format!("invalid participant status in database: {err}"))
    })
}

fn row_to_summary(row: UserSummaryRow) -> Result<UserSummary, ParticipantPersistenceError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        ParticipantPersistenceError::query(format!("invalid email in database: {err}"))
    })?;
    Ok(UserSummary {
        id: UserId::from_uuid(row.id),
        email,
        given_name: row.given_name,
        family_name: row.family_name,
    })
}

fn row_to_participant(
    row: ParticipantListingRow,
) -> Result<Participant, ParticipantPersistenceError> {
    let (status, invited_at, updated_at, user) = row;
    Ok(Participant {
        user: row_to_summary(user)?,
        status: parse_status(&status)?,
        invited_at,
        updated_at,
    })
}

fn row_to_invitation(
    row: PendingInvitationRow,
    resource: impl FnOnce(uuid::Uuid) -> SharedResource,
) -> Result<PendingInvitation, ParticipantPersistenceError> {
    let (resource_id, title, invited_at, inviter) = row;
    Ok(PendingInvitation {
        resource: resource(resource_id),
        title,
        inviter: row_to_summary(inviter)?,
        invited_at,
    })
}

#[async_trait]
impl ParticipantRepository for DieselParticipantRepository {
    async fn find_status(
        &self,
        resource: &SharedResource,
        user: &UserId,
    ) -> Result<Option<ParticipantStatus>, ParticipantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let status: Option<String> = match resource {
            SharedResource::Trip(trip) => {
                trip_participants::table
                    .find((*trip.as_uuid(), user_id))
                    .select(trip_participants::status)
                    .first(&mut conn)
                    .await
            }
            SharedResource::ItineraryItem(item) => {
                itinerary_participants::table
                    .find((*item.as_uuid(), user_id))
                    .select(itinerary_participants::status)
                    .first(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(map_diesel_error)?;
        status.as_deref().map(parse_status).transpose()
    }

    async fn insert(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *participation.user_id.as_uuid();
        let status = participation.status.as_str();
        let result = match participation.resource {
            SharedResource::Trip(trip) => {
                diesel::insert_into(trip_participants::table)
                    .values(&NewTripParticipantRow {
                        trip_id: *trip.as_uuid(),
                        user_id,
                        status,
                        created_at: participation.created_at,
                        updated_at: participation.updated_at,
                    })
                    .execute(&mut conn)
                    .await
            }
            SharedResource::ItineraryItem(item) => {
                diesel::insert_into(itinerary_participants::table)
                    .values(&NewItineraryParticipantRow {
                        itinerary_item_id: *item.as_uuid(),
                        user_id,
                        status,
                        created_at: participation.created_at,
                        updated_at: participation.updated_at,
                    })
                    .execute(&mut conn)
                    .await
            }
        };
        result.map(|_| ()).map_err(|err| {
            if is_unique_violation(&err) {
                ParticipantPersistenceError::already_exists(format!(
                    "user {} on {}",
                    participation.user_id, participation.resource
                ))
            } else {
                map_diesel_error(err)
            }
        })
    }

    async fn transition(
        &self,
        resource: &SharedResource,
        user: &UserId,
        from: ParticipantStatus,
        to: ParticipantStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, ParticipantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let updated = match resource {
            SharedResource::Trip(trip) => {
                diesel::update(
                    trip_participants::table
                        .filter(trip_participants::trip_id.eq(*trip.as_uuid()))
                        .filter(trip_participants::user_id.eq(user_id))
                        .filter(trip_participants::status.eq(from.as_str())),
                )
                .set((
                    trip_participants::status.eq(to.as_str()),
                    trip_participants::updated_at.eq(at),
                ))
                .execute(&mut conn)
                .await
            }
            SharedResource::ItineraryItem(item) => {
                diesel::update(
                    itinerary_participants::table
                        .filter(itinerary_participants::itinerary_item_id.eq(*item.as_uuid()))
                        .filter(itinerary_participants::user_id.eq(user_id))
                        .filter(itinerary_participants::status.eq(from.as_str())),
                )
                .set((
                    itinerary_participants::status.eq(to.as_str()),
                    itinerary_participants::updated_at.eq(at),
                ))
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_for_resource(
        &self,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, ParticipantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParticipantListingRow> = match resource {
            SharedResource::Trip(trip) => {
                trip_participants::table
                    .inner_join(users::table)
                    .filter(trip_participants::trip_id.eq(*trip.as_uuid()))
                    .order((
                        trip_participants::created_at.asc(),
                        trip_participants::user_id.asc(),
                    ))
                    .select((
                        trip_participants::status,
                        trip_participants::created_at,
                        trip_participants::updated_at,
                        UserSummaryRow::as_select(),
                    ))
                    .load(&mut conn)
                    .await
            }
            SharedResource::ItineraryItem(item) => {
                itinerary_participants::table
                    .inner_join(users::table)
                    .filter(itinerary_participants::itinerary_item_id.eq(*item.as_uuid()))
                    .order((
                        itinerary_participants::created_at.asc(),
                        itinerary_participants::user_id.asc(),
                    ))
                    .select((
                        itinerary_participants::status,
                        itinerary_participants::created_at,
                        itinerary_participants::updated_at,
                        UserSummaryRow::as_select(),
                    ))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_participant).collect()
    }

    async fn list_pending_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<PendingInvitation>, ParticipantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let invited = ParticipantStatus::Invited.as_str();

        let trip_rows: Vec<PendingInvitationRow> = trip_participants::table
            .inner_join(trips::table.inner_join(users::table))
            .filter(trip_participants::user_id.eq(user_id))
            .filter(trip_participants::status.eq(invited))
            .select((
                trip_participants::trip_id,
                trips::name,
                trip_participants::created_at,
                UserSummaryRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let item_rows: Vec<PendingInvitationRow> = itinerary_participants::table
            .inner_join(itinerary_items::table.inner_join(users::table))
            .filter(itinerary_participants::user_id.eq(user_id))
            .filter(itinerary_participants::status.eq(invited))
            .select((
                itinerary_participants::itinerary_item_id,
                itinerary_items::item_type,
                itinerary_participants::created_at,
                UserSummaryRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut pending = trip_rows
            .into_iter()
            .map(|row| {
                row_to_invitation(row, |id| SharedResource::Trip(TripId::from_uuid(id)))
            })
            .chain(item_rows.into_iter().map(|row| {
                row_to_invitation(row, |id| {
                    SharedResource::ItineraryItem(ItineraryItemId::from_uuid(id))
                })
            }))
            .collect::<Result<Vec<_>, _>>()?;
        pending.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
        Ok(pending)
    }
}
