//! Port abstraction for trip persistence adapters.
use async_trait::async_trait;

use crate::domain::{Trip, TripId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by trip repository adapters.
    pub enum TripPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trip repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError>;

    async fn find(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError>;

    /// Persist mutable trip fields. Returns `false` when the trip no longer
    /// exists.
    async fn update(&self, trip: &Trip) -> Result<bool, TripPersistenceError>;

    /// Delete a trip together with its participant rows. Items attached to
    /// the trip are detached, not deleted. Returns `false` when nothing was
    /// removed.
    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError>;

    /// Trips the user created or holds a participant row for, in any status.
    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError>;
}
