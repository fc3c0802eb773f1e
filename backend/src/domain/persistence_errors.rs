//! Mapping from repository port errors to API errors.
//!
//! Connection failures surface as `service_unavailable`; everything else the
//! caller cannot fix becomes `internal_error`.

use serde_json::json;
use tracing::debug;

use super::Error;
use super::ports::{
    ItineraryPersistenceError, ParticipantPersistenceError, TripPersistenceError,
    UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    debug!(%error, "user repository failure");
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("user with email {email} already exists"))
        }
    }
}

pub(crate) fn map_trip_error(error: TripPersistenceError) -> Error {
    debug!(%error, "trip repository failure");
    match error {
        TripPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("trip repository unavailable: {message}"))
        }
        TripPersistenceError::Query { message } => {
            Error::internal(format!("trip repository error: {message}"))
        }
    }
}

pub(crate) fn map_participant_error(error: ParticipantPersistenceError) -> Error {
    debug!(%error, "participant repository failure");
    match error {
        ParticipantPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("participant repository unavailable: {message}"))
        }
        ParticipantPersistenceError::Query { message } => {
            Error::internal(format!("participant repository error: {message}"))
        }
        ParticipantPersistenceError::AlreadyExists { message } => {
            Error::conflict(format!("already invited or participating: {message}"))
                .with_details(json!({ "code": "already_invited" }))
        }
    }
}

pub(crate) fn map_itinerary_error(error: ItineraryPersistenceError) -> Error {
    debug!(%error, "itinerary repository failure");
    match error {
        ItineraryPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("itinerary repository unavailable: {message}"))
        }
        ItineraryPersistenceError::Query { message }
        | ItineraryPersistenceError::Corrupt { message } => {
            Error::internal(format!("itinerary repository error: {message}"))
        }
    }
}
