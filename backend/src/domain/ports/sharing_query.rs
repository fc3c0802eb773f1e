//! Driving port for participant and invitation listings.

use async_trait::async_trait;

use crate::domain::{Error, Participant, PendingInvitation, SharedResource, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharingQuery: Send + Sync {
    /// Participants of a resource the actor can access.
    async fn list_participants(
        &self,
        actor: &UserId,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, Error>;

    /// Invitations awaiting the actor's answer, newest first.
    async fn pending_invitations(&self, actor: &UserId) -> Result<Vec<PendingInvitation>, Error>;
}
