//! Port abstraction for trip and itinerary item participant rows.
//!
//! Both sharing scopes live behind one port keyed by [`SharedResource`].
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Participant, ParticipantStatus, Participation, PendingInvitation, SharedResource, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by participant repository adapters.
    pub enum ParticipantPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "participant repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "participant repository query failed: {message}",
        /// A row already exists for the (resource, user) pair.
        AlreadyExists { message: String } => "participant already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Status of the user's row for the resource, if any.
    async fn find_status(
        &self,
        resource: &SharedResource,
        user: &UserId,
    ) -> Result<Option<ParticipantStatus>, ParticipantPersistenceError>;

    /// Insert a new row. Concurrent inserts for the same pair must leave
    /// exactly one row; losers receive `AlreadyExists`.
    async fn insert(&self, participation: &Participation)
    -> Result<(), ParticipantPersistenceError>;

    /// Compare-and-set status change. Returns `false` when the row is missing
    /// or no longer in `from`.
    async fn transition(
        &self,
        resource: &SharedResource,
        user: &UserId,
        from: ParticipantStatus,
        to: ParticipantStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, ParticipantPersistenceError>;

    /// Participants of a resource with their profiles, oldest invitation first.
    async fn list_for_resource(
        &self,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, ParticipantPersistenceError>;

    /// Invitations still awaiting the user's answer, newest first.
    async fn list_pending_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<PendingInvitation>, ParticipantPersistenceError>;
}
