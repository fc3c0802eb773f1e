//! Invitation lifecycle for trips and itinerary items.
//!
//! One implementation serves both sharing scopes; the [`SharedResource`]
//! argument selects the scope.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access_control_service::{
    AccessControlService, item_not_found, trip_not_found,
};
use crate::domain::persistence_errors::{
    map_itinerary_error, map_participant_error, map_trip_error, map_user_error,
};
use crate::domain::ports::{
    ItineraryRepository, ParticipantRepository, SharingCommand, SharingQuery, TripRepository,
    UserRepository,
};
use crate::domain::timestamps::stored_now;
use crate::domain::{
    EmailAddress, Error, InvitationResponse, Participant, ParticipantStatus,
    ParticipantTransition, Participation, PendingInvitation, SharedResource, TransitionError,
    UserId, item_access, trip_access,
};

/// Sharing service implementing [`SharingCommand`] and [`SharingQuery`].
pub struct SharingService<T, P, I, U> {
    trips: Arc<T>,
    participants: Arc<P>,
    items: Arc<I>,
    users: Arc<U>,
    access: AccessControlService<T, P, I>,
    clock: Arc<dyn Clock>,
}

impl<T, P, I, U> SharingService<T, P, I, U> {
    pub fn new(
        trips: Arc<T>,
        participants: Arc<P>,
        items: Arc<I>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let access = AccessControlService::new(
            Arc::clone(&trips),
            Arc::clone(&participants),
            Arc::clone(&items),
        );
        Self {
            trips,
            participants,
            items,
            users,
            access,
            clock,
        }
    }
}

/// Owner and visibility of a shared resource from the actor's viewpoint.
struct ResourceView {
    owner_id: UserId,
    accessible: bool,
}

fn invalid_transition(error: TransitionError) -> Error {
    Error::conflict(error.to_string()).with_details(json!({
        "code": "invalid_transition",
        "from": error.from,
        "to": error.to,
    }))
}

fn resource_not_found(resource: &SharedResource) -> Error {
    match resource {
        SharedResource::Trip(id) => trip_not_found(id),
        SharedResource::ItineraryItem(id) => item_not_found(id),
    }
}

impl<T, P, I, U> SharingService<T, P, I, U>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
    U: UserRepository,
{
    async fn view(&self, actor: &UserId, resource: &SharedResource) -> Result<ResourceView, Error> {
        match resource {
            SharedResource::Trip(id) => {
                let trip = self
                    .trips
                    .find(id)
                    .await
                    .map_err(map_trip_error)?
                    .ok_or_else(|| trip_not_found(id))?;
                let facts = self.access.trip_facts(actor, &trip).await?;
                Ok(ResourceView {
                    owner_id: trip.owner_id,
                    accessible: trip_access(actor, &facts),
                })
            }
            SharedResource::ItineraryItem(id) => {
                let item = self
                    .items
                    .find(id)
                    .await
                    .map_err(map_itinerary_error)?
                    .ok_or_else(|| item_not_found(id))?;
                let facts = self.access.item_facts(actor, &item).await?;
                Ok(ResourceView {
                    owner_id: item.owner_id,
                    accessible: item_access(actor, &facts),
                })
            }
        }
    }

    /// Drive the actor's own participant row through `transition`.
    async fn transition(
        &self,
        actor: &UserId,
        resource: &SharedResource,
        transition: ParticipantTransition,
    ) -> Result<ParticipantStatus, Error> {
        let view = self.view(actor, resource).await?;
        if view.owner_id == *actor {
            return Err(Error::forbidden(format!(
                "the owner of a {} has no invitation to answer",
                resource.label()
            )));
        }
        let current = self
            .participants
            .find_status(resource, actor)
            .await
            .map_err(map_participant_error)?;
        let Some(current) = current else {
            return Err(if view.accessible {
                invalid_transition(TransitionError {
                    from: ParticipantStatus::Unknown,
                    to: transition.target(),
                })
            } else {
                resource_not_found(resource)
            });
        };
        let next = current.apply(transition).map_err(invalid_transition)?;
        let applied = self
            .participants
            .transition(resource, actor, current, next, stored_now(&*self.clock))
            .await
            .map_err(map_participant_error)?;
        if !applied {
            return Err(Error::conflict(
                "participant status changed concurrently; reload and retry",
            ));
        }
        info!(
            %resource,
            user_id = %actor,
            from = %current,
            to = %next,
            "participant status changed"
        );
        Ok(next)
    }
}

#[async_trait]
impl<T, P, I, U> SharingCommand for SharingService<T, P, I, U>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
    U: UserRepository,
{
    async fn invite(
        &self,
        actor: &UserId,
        resource: &SharedResource,
        email: &EmailAddress,
    ) -> Result<Participant, Error> {
        let view = self.view(actor, resource).await?;
        if !view.accessible {
            return Err(resource_not_found(resource));
        }
        if view.owner_id != *actor {
            return Err(Error::forbidden(format!(
                "only the owner of a {} may invite participants",
                resource.label()
            )));
        }
        let invitee = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                Error::not_found(format!("no user is registered with email {email}"))
                    .with_details(json!({ "field": "email", "code": "user_not_found" }))
            })?;
        if invitee.id == *actor {
            return Err(Error::conflict("owners cannot invite themselves")
                .with_details(json!({ "field": "email", "code": "self_invitation" })));
        }
        let existing = self
            .participants
            .find_status(resource, &invitee.id)
            .await
            .map_err(map_participant_error)?;
        if let Some(status) = existing {
            return Err(Error::conflict(format!(
                "{email} is already invited or participating"
            ))
            .with_details(json!({ "code": "already_invited", "status": status })));
        }

        let now = stored_now(&*self.clock);
        let participation = Participation {
            resource: *resource,
            user_id: invitee.id,
            status: ParticipantStatus::Invited,
            created_at: now,
            updated_at: now,
        };
        self.participants
            .insert(&participation)
            .await
            .map_err(map_participant_error)?;
        info!(%resource, inviter_id = %actor, invitee_id = %invitee.id, "participant invited");
        Ok(Participant {
            user: invitee.summary(),
            status: ParticipantStatus::Invited,
            invited_at: now,
            updated_at: now,
        })
    }

    async fn respond(
        &self,
        actor: &UserId,
        resource: &SharedResource,
        response: InvitationResponse,
    ) -> Result<ParticipantStatus, Error> {
        self.transition(actor, resource, ParticipantTransition::Respond(response))
            .await
    }

    async fn leave(&self, actor: &UserId, resource: &SharedResource) -> Result<(), Error> {
        self.transition(actor, resource, ParticipantTransition::Leave)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl<T, P, I, U> SharingQuery for SharingService<T, P, I, U>
where
    T: TripRepository,
    P: ParticipantRepository,
    I: ItineraryRepository,
    U: UserRepository,
{
    async fn list_participants(
        &self,
        actor: &UserId,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, Error> {
        let view = self.view(actor, resource).await?;
        if !view.accessible {
            return Err(resource_not_found(resource));
        }
        self.participants
            .list_for_resource(resource)
            .await
            .map_err(map_participant_error)
    }

    async fn pending_invitations(&self, actor: &UserId) -> Result<Vec<PendingInvitation>, Error> {
        self.participants
            .list_pending_for_user(actor)
            .await
            .map_err(map_participant_error)
    }
}

#[cfg(test)]
#[path = "sharing_service_tests.rs"]
mod tests;
