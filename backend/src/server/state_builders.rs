//! Builders wiring repositories and adapters into HTTP state.

use std::sync::Arc;

use mockable::Clock;

use tripshare::domain::ports::{
    IdentityOracle, ItineraryRepository, ParticipantRepository, TripRepository, UserRepository,
};
use tripshare::domain::{ItineraryService, SharingService, SignInService, TripService};
use tripshare::inbound::http::state::HttpState;
use tripshare::outbound::persistence::{
    DbPool, DieselItineraryRepository, DieselParticipantRepository, DieselTripRepository,
    DieselUserRepository,
};

/// One handle per repository port.
pub(crate) struct Repositories<U, T, P, I> {
    pub(crate) users: Arc<U>,
    pub(crate) trips: Arc<T>,
    pub(crate) participants: Arc<P>,
    pub(crate) items: Arc<I>,
}

impl
    Repositories<
        DieselUserRepository,
        DieselTripRepository,
        DieselParticipantRepository,
        DieselItineraryRepository,
    >
{
    /// Diesel repositories sharing `pool`.
    pub(crate) fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            trips: Arc::new(DieselTripRepository::new(pool.clone())),
            participants: Arc::new(DieselParticipantRepository::new(pool.clone())),
            items: Arc::new(DieselItineraryRepository::new(pool.clone())),
        }
    }
}

/// Build every driving port over the given repositories.
pub(crate) fn build_http_state<U, T, P, I, O>(
    repos: Repositories<U, T, P, I>,
    identity: Arc<O>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TripRepository + 'static,
    P: ParticipantRepository + 'static,
    I: ItineraryRepository + 'static,
    O: IdentityOracle + 'static,
{
    let Repositories {
        users,
        trips,
        participants,
        items,
    } = repos;

    let trip_service = Arc::new(TripService::new(
        Arc::clone(&trips),
        Arc::clone(&participants),
        Arc::clone(&items),
        Arc::clone(&clock),
    ));
    let itinerary_service = Arc::new(ItineraryService::new(
        Arc::clone(&trips),
        Arc::clone(&participants),
        Arc::clone(&items),
        Arc::clone(&clock),
    ));
    let sharing_service = Arc::new(SharingService::new(
        trips,
        participants,
        items,
        Arc::clone(&users),
        Arc::clone(&clock),
    ));
    let sign_in = Arc::new(SignInService::new(users, identity, clock));

    HttpState {
        authenticator: sign_in,
        trips: trip_service.clone(),
        trips_query: trip_service,
        itinerary: itinerary_service.clone(),
        itinerary_query: itinerary_service,
        sharing: sharing_service.clone(),
        sharing_query: sharing_service,
    }
}
