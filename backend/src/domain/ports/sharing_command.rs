//! Driving port for the invitation lifecycle of trips and itinerary items.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, InvitationResponse, Participant, ParticipantStatus, SharedResource,
    UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharingCommand: Send + Sync {
    /// Invite the user registered under `email`. Only the resource owner may
    /// invite.
    async fn invite(
        &self,
        actor: &UserId,
        resource: &SharedResource,
        email: &EmailAddress,
    ) -> Result<Participant, Error>;

    /// Accept or decline a pending invitation addressed to `actor`.
    async fn respond(
        &self,
        actor: &UserId,
        resource: &SharedResource,
        response: InvitationResponse,
    ) -> Result<ParticipantStatus, Error>;

    /// Leave a resource the actor has joined.
    async fn leave(&self, actor: &UserId, resource: &SharedResource) -> Result<(), Error>;
}
