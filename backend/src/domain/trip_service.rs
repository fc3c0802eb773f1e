//! Trip domain services.
//!
//! Implements the trip driving ports on top of the repository ports and the
//! store-backed access checks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access_control_service::AccessControlService;
use crate::domain::persistence_errors::{map_itinerary_error, map_trip_error};
use crate::domain::ports::{
    ItineraryRepository, ParticipantRepository, TripCommand, TripDetails, TripQuery,
    TripRepository,
};
use crate::domain::timestamps::stored_now;
use crate::domain::{
    Error, Trip, TripDraft, TripId, TripPatch, TripValidationError, UserId, sort_chronologically,
};

/// Trip service implementing [`TripCommand`] and [`TripQuery`].
pub struct TripService<T, P, I> {
    trips: Arc<T>,
    items: Arc<I>,
    access: AccessControlService<T, P, I>,
    clock: Arc<dyn Clock>,
}

impl<T, P, I> TripService<T, P, I> {
    pub fn new(trips: Arc<T>, participants: Arc<P>, items: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        let access =
            AccessControlService::new(Arc::clone(&trips), participants, Arc::clone(&items));
        Self {
            trips,
            items,
            access,
            clock,
        }
    }
}

pub(crate) fn map_trip_validation_error(error: TripValidationError) -> Error {
    let (field, code) = match error {
        TripValidationError::EmptyName => ("name", "empty"),
        TripValidationError::NameTooLong { .. } => ("name", "too_long"),
        TripValidationError::EndBeforeStart => ("endDate", "end_before_start"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

#[async_trait]
impl<T, P, I> TripCommand for TripService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    async fn create_trip(&self, actor: &UserId, draft: TripDraft) -> Result<Trip, Error> {
        let trip = Trip::create(TripId::random(), *actor, draft, stored_now(&*self.clock));
        self.trips.insert(&trip).await.map_err(map_trip_error)?;
        info!(trip_id = %trip.id, owner_id = %actor, "trip created");
        Ok(trip)
    }

    async fn update_trip(
        &self,
        actor: &UserId,
        trip: &TripId,
        patch: TripPatch,
    ) -> Result<Trip, Error> {
        let mut current = self.access.load_trip(actor, trip).await?;
        current
            .apply(patch, stored_now(&*self.clock))
            .map_err(map_trip_validation_error)?;
        let stored = self.trips.update(&current).await.map_err(map_trip_error)?;
        if !stored {
            return Err(Error::not_found(format!("trip {trip} not found")));
        }
        info!(trip_id = %trip, actor_id = %actor, "trip updated");
        Ok(current)
    }

    async fn delete_trip(&self, actor: &UserId, trip: &TripId) -> Result<(), Error> {
        let current = self.access.load_trip(actor, trip).await?;
        if !current.is_owned_by(actor) {
            return Err(Error::forbidden("only the trip owner may delete a trip"));
        }
        let removed = self.trips.delete(trip).await.map_err(map_trip_error)?;
        if !removed {
            return Err(Error::not_found(format!("trip {trip} not found")));
        }
        info!(trip_id = %trip, owner_id = %actor, "trip deleted");
        Ok(())
    }
}

#[async_trait]
impl<T, P, I> TripQuery for TripService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    async fn list_trips(&self, actor: &UserId, future_only: bool) -> Result<Vec<Trip>, Error> {
        let mut trips = self
            .trips
            .list_for_member(actor)
            .await
            .map_err(map_trip_error)?;
        if future_only {
            let now = self.clock.utc();
            trips.retain(|trip| trip.starts_on_or_after(now));
        }
        sort_chronologically(&mut trips);
        Ok(trips)
    }

    async fn trip_details(&self, actor: &UserId, trip: &TripId) -> Result<TripDetails, Error> {
        let trip = self.access.load_trip(actor, trip).await?;
        let mut items = self
            .items
            .list_for_trip(&trip.id)
            .await
            .map_err(map_itinerary_error)?;
        sort_chronologically(&mut items);
        Ok(TripDetails { trip, items })
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
