//! Itinerary item domain services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access_control_service::{AccessControlService, item_not_found};
use crate::domain::persistence_errors::map_itinerary_error;
use crate::domain::ports::{
    ItineraryCommand, ItineraryQuery, ItineraryRepository, ParticipantRepository, TripRepository,
};
use crate::domain::timestamps::stored_now;
use crate::domain::{
    DetailsError, Error, ItemDraft, ItemPatch, ItemValidationError, ItineraryItem,
    ItineraryItemId, TripId, UserId, item_access, sort_chronologically,
};

/// Itinerary service implementing [`ItineraryCommand`] and
/// [`ItineraryQuery`].
pub struct ItineraryService<T, P, I> {
    items: Arc<I>,
    access: AccessControlService<T, P, I>,
    clock: Arc<dyn Clock>,
}

impl<T, P, I> ItineraryService<T, P, I> {
    pub fn new(trips: Arc<T>, participants: Arc<P>, items: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        let access = AccessControlService::new(trips, participants, Arc::clone(&items));
        Self {
            items,
            access,
            clock,
        }
    }
}

/// Convert item validation failures into `invalid_request` errors carrying
/// the offending field.
pub(crate) fn map_item_validation_error(error: ItemValidationError) -> Error {
    let (field, code) = match &error {
        ItemValidationError::InvalidBookingUrl => (Some("bookingUrl"), "invalid_url"),
        ItemValidationError::Details(details) => (details.field(), details_code(details)),
    };
    let mut body = json!({ "code": code });
    if let Some(field) = field {
        body["field"] = json!(field);
    }
    Error::invalid_request(error.to_string()).with_details(body)
}

fn details_code(error: &DetailsError) -> &'static str {
    match error {
        DetailsError::UnknownItemType { .. } => "unknown_item_type",
        DetailsError::MissingField { .. } => "missing_field",
        DetailsError::InvalidField { .. } => "invalid_field",
        DetailsError::UnexpectedField { .. } => "unexpected_field",
    }
}

impl<T, P, I> ItineraryService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    async fn ensure_trip_access(&self, actor: &UserId, trip: &TripId) -> Result<(), Error> {
        self.access.load_trip(actor, trip).await.map(|_| ())
    }
}

#[async_trait]
impl<T, P, I> ItineraryCommand for ItineraryService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    async fn create_item(&self, actor: &UserId, draft: ItemDraft) -> Result<ItineraryItem, Error> {
        if let Some(trip) = &draft.trip_id {
            self.ensure_trip_access(actor, trip).await?;
        }
        let now = stored_now(&*self.clock);
        let item = ItineraryItem::create(ItineraryItemId::random(), *actor, draft, now);
        self.items.insert(&item).await.map_err(map_itinerary_error)?;
        info!(
            item_id = %item.id,
            kind = %item.kind(),
            owner_id = %actor,
            "itinerary item created"
        );
        Ok(item)
    }

    async fn update_item(
        &self,
        actor: &UserId,
        item: &ItineraryItemId,
        patch: ItemPatch,
    ) -> Result<ItineraryItem, Error> {
        let mut current = self.access.load_item(actor, item).await?;
        if let Some(trip) = &patch.trip_id {
            if current.trip_id.as_ref() != Some(trip) {
                self.ensure_trip_access(actor, trip).await?;
            }
        }
        current
            .apply(patch, stored_now(&*self.clock))
            .map_err(map_item_validation_error)?;
        let stored = self
            .items
            .update(&current)
            .await
            .map_err(map_itinerary_error)?;
        if !stored {
            return Err(item_not_found(item));
        }
        info!(item_id = %item, actor_id = %actor, "itinerary item updated");
        Ok(current)
    }

    async fn delete_item(&self, actor: &UserId, item: &ItineraryItemId) -> Result<(), Error> {
        self.access.load_item(actor, item).await?;
        let removed = self.items.delete(item).await.map_err(map_itinerary_error)?;
        if !removed {
            return Err(item_not_found(item));
        }
        info!(item_id = %item, actor_id = %actor, "itinerary item deleted");
        Ok(())
    }
}

#[async_trait]
impl<T, P, I> ItineraryQuery for ItineraryService<T, P, I>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
{
    async fn list_items(
        &self,
        actor: &UserId,
        trip: Option<TripId>,
    ) -> Result<Vec<ItineraryItem>, Error> {
        let candidates = self
            .items
            .list_candidates(actor, trip)
            .await
            .map_err(map_itinerary_error)?;
        let mut visible: Vec<ItineraryItem> = candidates
            .into_iter()
            .filter(|candidate| item_access(actor, &candidate.access))
            .map(|candidate| candidate.item)
            .collect();
        sort_chronologically(&mut visible);
        Ok(visible)
    }

    async fn get_item(
        &self,
        actor: &UserId,
        item: &ItineraryItemId,
    ) -> Result<ItineraryItem, Error> {
        self.access.load_item(actor, item).await
    }
}

#[cfg(test)]
#[path = "itinerary_service_tests.rs"]
mod tests;
