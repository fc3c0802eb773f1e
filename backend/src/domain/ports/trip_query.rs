//! Driving port for trip reads.

use async_trait::async_trait;

use crate::domain::{Error, ItineraryItem, Trip, TripId, UserId};

/// A trip together with its chronologically ordered items.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetails {
    pub trip: Trip,
    pub items: Vec<ItineraryItem>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripQuery: Send + Sync {
    /// Trips the user created or holds any participant row for, ordered by
    /// start date with undated trips last. With `future_only`, only trips
    /// whose start date is at or after the current instant are returned.
    async fn list_trips(&self, actor: &UserId, future_only: bool) -> Result<Vec<Trip>, Error>;

    /// Fetch one trip with its items. Absent and inaccessible trips both
    /// yield `not_found`.
    async fn trip_details(&self, actor: &UserId, trip: &TripId) -> Result<TripDetails, Error>;
}
