//! Driving port for itinerary item mutations.

use async_trait::async_trait;

use crate::domain::{Error, ItemDraft, ItemPatch, ItineraryItem, ItineraryItemId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryCommand: Send + Sync {
    /// Create an item owned by `actor`. Attaching it to a trip requires
    /// access to that trip.
    async fn create_item(&self, actor: &UserId, draft: ItemDraft) -> Result<ItineraryItem, Error>;

    /// Apply a partial update on behalf of anyone with access to the item.
    async fn update_item(
        &self,
        actor: &UserId,
        item: &ItineraryItemId,
        patch: ItemPatch,
    ) -> Result<ItineraryItem, Error>;

    /// Delete an item on behalf of anyone with access to it.
    async fn delete_item(&self, actor: &UserId, item: &ItineraryItemId) -> Result<(), Error>;
}
