//! Driving port for itinerary item reads.

use async_trait::async_trait;

use crate::domain::{Error, ItineraryItem, ItineraryItemId, TripId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryQuery: Send + Sync {
    /// Items visible to `actor`, optionally restricted to one trip, ordered
    /// by their derived sort timestamp.
    async fn list_items(
        &self,
        actor: &UserId,
        trip: Option<TripId>,
    ) -> Result<Vec<ItineraryItem>, Error>;

    /// Fetch one item; inaccessible items yield `not_found`.
    async fn get_item(
        &self,
        actor: &UserId,
        item: &ItineraryItemId,
    ) -> Result<ItineraryItem, Error>;
}
