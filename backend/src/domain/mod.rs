//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed trip sharing entities and the services that
//! enforce access control and the invitation lifecycle. Nothing in this module
//! depends on HTTP or SQL; adapters reach it through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Trip, ItineraryItem, User: aggregates.
//! - ParticipantStatus and its transitions: invitation state machine.
//! - `trip_access`/`item_access`: pure access rules.
//! - Trip, itinerary, sharing, and sign-in services implementing the driving
//!   ports.

pub mod access;
pub mod access_control_service;
pub mod error;
pub mod identity;
pub mod ids;
pub mod itinerary;
pub mod itinerary_service;
pub mod ordering;
pub mod participant;
mod persistence_errors;
pub mod ports;
pub mod sharing_service;
pub mod sign_in_service;
pub mod timestamps;
pub mod trace_id;
pub mod trip;
pub mod trip_service;
pub mod user;

pub use self::access::{ItemAccessFacts, TripAccessFacts, item_access, trip_access};
pub use self::access_control_service::AccessControlService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{BearerCredential, VerifiedIdentity};
pub use self::ids::{ItineraryItemId, TripId, UserId};
pub use self::itinerary::{
    AccommodationDetails, ActivityDetails, BookingUrl, CarRentalDetails, DetailsError, FieldMap,
    FlightDetails, GroundTransportationDetails, ItemDetails, ItemDraft, ItemKind, ItemPatch,
    ItemValidationError, ItineraryItem,
};
pub use self::itinerary_service::ItineraryService;
pub use self::ordering::{Chronological, SortKey, chronological_order, sort_chronologically};
pub use self::participant::{
    InvitationResponse, Participant, ParticipantStatus, ParticipantTransition, Participation,
    PendingInvitation, SharedResource, TransitionError, UnknownParticipantStatus,
};
pub use self::sharing_service::SharingService;
pub use self::sign_in_service::SignInService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{
    TRIP_NAME_MAX, Trip, TripDraft, TripName, TripPatch, TripSchedule, TripValidationError,
};
pub use self::trip_service::TripService;
pub use self::user::{
    EmailAddress, NewUser, OAuthLink, User, UserStatus, UserSummary, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use tripshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
