//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod identity_oracle;
mod itinerary_command;
mod itinerary_query;
mod itinerary_repository;
mod participant_repository;
mod sharing_command;
mod sharing_query;
mod trip_command;
mod trip_query;
mod trip_repository;
mod user_repository;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{Authenticator, SignInOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use identity_oracle::FixtureIdentityOracle;
#[cfg(test)]
pub use identity_oracle::MockIdentityOracle;
pub use identity_oracle::{IdentityError, IdentityOracle};
#[cfg(test)]
pub use itinerary_command::MockItineraryCommand;
pub use itinerary_command::ItineraryCommand;
#[cfg(test)]
pub use itinerary_query::MockItineraryQuery;
pub use itinerary_query::ItineraryQuery;
#[cfg(test)]
pub use itinerary_repository::MockItineraryRepository;
pub use itinerary_repository::{ItemCandidate, ItineraryPersistenceError, ItineraryRepository};
#[cfg(test)]
pub use participant_repository::MockParticipantRepository;
pub use participant_repository::{ParticipantPersistenceError, ParticipantRepository};
#[cfg(test)]
pub use sharing_command::MockSharingCommand;
pub use sharing_command::SharingCommand;
#[cfg(test)]
pub use sharing_query::MockSharingQuery;
pub use sharing_query::SharingQuery;
#[cfg(test)]
pub use trip_command::MockTripCommand;
pub use trip_command::TripCommand;
#[cfg(test)]
pub use trip_query::MockTripQuery;
pub use trip_query::{TripDetails, TripQuery};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{TripPersistenceError, TripRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
