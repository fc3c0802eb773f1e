//! HTTP state wired over the in-memory store.

use std::sync::Arc;

use mockable::Clock;

use super::in_memory::InMemoryStore;
use crate::domain::ports::IdentityOracle;
use crate::domain::{ItineraryService, SharingService, SignInService, TripService};
use crate::inbound::http::state::HttpState;

/// Build every driving port over one shared in-memory store.
#[must_use]
pub fn in_memory_state<O>(
    store: &Arc<InMemoryStore>,
    identity: Arc<O>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    O: IdentityOracle + 'static,
{
    let trips = Arc::new(TripService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(&clock),
    ));
    let items = Arc::new(ItineraryService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(&clock),
    ));
    let sharing = Arc::new(SharingService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(&clock),
    ));
    HttpState {
        authenticator: Arc::new(SignInService::new(Arc::clone(store), identity, clock)),
        trips: trips.clone(),
        trips_query: trips,
        itinerary: items.clone(),
        itinerary_query: items,
        sharing: sharing.clone(),
        sharing_query: sharing,
    }
}
