//! Port abstraction for itinerary item persistence adapters.
use async_trait::async_trait;

use crate::domain::{ItemAccessFacts, ItineraryItem, ItineraryItemId, TripId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by itinerary repository adapters.
    pub enum ItineraryPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "itinerary repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "itinerary repository query failed: {message}",
        /// A stored row no longer validates as an itinerary item.
        Corrupt { message: String } => "stored itinerary item is invalid: {message}",
    }
}

/// Listing candidate paired with the facts needed to decide access.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCandidate {
    pub item: ItineraryItem,
    pub access: ItemAccessFacts,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    async fn insert(&self, item: &ItineraryItem) -> Result<(), ItineraryPersistenceError>;

    async fn find(
        &self,
        id: &ItineraryItemId,
    ) -> Result<Option<ItineraryItem>, ItineraryPersistenceError>;

    /// Persist mutable item fields. Returns `false` when the item no longer
    /// exists.
    async fn update(&self, item: &ItineraryItem) -> Result<bool, ItineraryPersistenceError>;

    /// Delete an item and its participant rows.
    async fn delete(&self, id: &ItineraryItemId) -> Result<bool, ItineraryPersistenceError>;

    /// Every item attached to a trip.
    async fn list_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<ItineraryItem>, ItineraryPersistenceError>;

    /// Items the user may be able to see: owned items, items on trips the
    /// user owns or participates in, and items shared with the user directly.
    /// Each candidate carries its access facts; callers make the decision.
    async fn list_candidates(
        &self,
        user: &UserId,
        trip: Option<TripId>,
    ) -> Result<Vec<ItemCandidate>, ItineraryPersistenceError>;
}
