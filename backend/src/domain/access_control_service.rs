//! Store-backed access control.
//!
//! Gathers ownership and participant facts from the repositories and hands
//! them to the pure rules in [`crate::domain::access`]. Lookups never mutate
//! state.

use std::sync::Arc;

use crate::domain::ports::{ItineraryRepository, ParticipantRepository, TripRepository};
use crate::domain::{
    Error, ItemAccessFacts, ItineraryItem, ItineraryItemId, SharedResource, Trip, TripAccessFacts,
    TripId, UserId, item_access, trip_access,
};
use crate::domain::persistence_errors::{
    map_itinerary_error, map_participant_error, map_trip_error,
};

/// Answers access questions for trips and itinerary items.
pub struct AccessControlService<T, P, I> {
    trips: Arc<T>,
    participants: Arc<P>,
    items: Arc<I>,
}

impl<T, P, I> Clone for AccessControlService<T, P, I> {
    fn clone(&self) -> Self {
        Self {
            trips: Arc::clone(&self.trips),
            participants: Arc::clone(&self.participants),
            items: Arc::clone(&self.items),
        }
    }
}

impl<T, P, I> AccessControlService<T, P, I> {
    pub fn new(trips: Arc<T>, participants: Arc<P>, items: Arc<I>) -> Self {
        Self {
            trips,
            participants,
            items,
        }
    }
}

impl<T, P, I> AccessControlService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    /// Whether `user` may read or modify the trip. Missing trips are simply
    /// inaccessible.
    pub async fn can_access_trip(&self, user: &UserId, trip: &TripId) -> Result<bool, Error> {
        match self.trips.find(trip).await.map_err(map_trip_error)? {
            Some(found) => Ok(trip_access(user, &self.trip_facts(user, &found).await?)),
            None => Ok(false),
        }
    }

    /// Whether `user` may read or modify the itinerary item.
    pub async fn can_access_item(
        &self,
        user: &UserId,
        item: &ItineraryItemId,
    ) -> Result<bool, Error> {
        match self.items.find(item).await.map_err(map_itinerary_error)? {
            Some(found) => Ok(item_access(user, &self.item_facts(user, &found).await?)),
            None => Ok(false),
        }
    }

    /// Load a trip the user can access. Absent and inaccessible trips are
    /// both reported as `not_found`.
    pub async fn load_trip(&self, user: &UserId, id: &TripId) -> Result<Trip, Error> {
        let trip = self
            .trips
            .find(id)
            .await
            .map_err(map_trip_error)?
            .ok_or_else(|| trip_not_found(id))?;
        if trip_access(user, &self.trip_facts(user, &trip).await?) {
            Ok(trip)
        } else {
            Err(trip_not_found(id))
        }
    }

    /// Load an item the user can access, masking denial as `not_found`.
    pub async fn load_item(
        &self,
        user: &UserId,
        id: &ItineraryItemId,
    ) -> Result<ItineraryItem, Error> {
        let item = self
            .items
            .find(id)
            .await
            .map_err(map_itinerary_error)?
            .ok_or_else(|| item_not_found(id))?;
        if item_access(user, &self.item_facts(user, &item).await?) {
            Ok(item)
        } else {
            Err(item_not_found(id))
        }
    }

    pub(crate) async fn trip_facts(
        &self,
        user: &UserId,
        trip: &Trip,
    ) -> Result<TripAccessFacts, Error> {
        let status = if trip.is_owned_by(user) {
            None
        } else {
            self.participants
                .find_status(&SharedResource::Trip(trip.id), user)
                .await
                .map_err(map_participant_error)?
        };
        Ok(TripAccessFacts {
            owner_id: trip.owner_id,
            status,
        })
    }

    pub(crate) async fn item_facts(
        &self,
        user: &UserId,
        item: &ItineraryItem,
    ) -> Result<ItemAccessFacts, Error> {
        if item.is_owned_by(user) {
            return Ok(ItemAccessFacts {
                owner_id: item.owner_id,
                status: None,
                trip: None,
            });
        }
        let status = self
            .participants
            .find_status(&SharedResource::ItineraryItem(item.id), user)
            .await
            .map_err(map_participant_error)?;
        let trip = match item.trip_id {
            Some(trip_id) => match self.trips.find(&trip_id).await.map_err(map_trip_error)? {
                Some(parent) => Some(self.trip_facts(user, &parent).await?),
                None => None,
            },
            None => None,
        };
        Ok(ItemAccessFacts {
            owner_id: item.owner_id,
            status,
            trip,
        })
    }
}

pub(crate) fn trip_not_found(id: &TripId) -> Error {
    Error::not_found(format!("trip {id} not found"))
}

pub(crate) fn item_not_found(id: &ItineraryItemId) -> Error {
    Error::not_found(format!("itinerary item {id} not found"))
}

#[cfg(test)]
#[path = "access_control_service_tests.rs"]
mod tests;
