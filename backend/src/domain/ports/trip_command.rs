//! Driving port for trip mutations.

use async_trait::async_trait;

use crate::domain::{Error, Trip, TripDraft, TripId, TripPatch, UserId};

/// Driving port for trip write operations.
///
/// Every call names the acting user; implementations enforce ownership and
/// participant access before touching storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripCommand: Send + Sync {
    /// Create a trip owned by `actor`.
    async fn create_trip(&self, actor: &UserId, draft: TripDraft) -> Result<Trip, Error>;

    /// Apply a partial update. Owners and participants with access may
    /// update; everyone else receives `not_found`.
    async fn update_trip(
        &self,
        actor: &UserId,
        trip: &TripId,
        patch: TripPatch,
    ) -> Result<Trip, Error>;

    /// Delete a trip. Only the owner may delete.
    async fn delete_trip(&self, actor: &UserId, trip: &TripId) -> Result<(), Error>;
}
