//! Sharing HTTP handlers: invitations and participation for trips and
//! itinerary items.
//!
//! ```text
//! POST   /api/v1/trips/{id}/participants
//! GET    /api/v1/trips/{id}/participants
//! PUT    /api/v1/trips/{id}/invitation
//! DELETE /api/v1/trips/{id}/participation
//! POST   /api/v1/itinerary-items/{id}/participants
//! GET    /api/v1/itinerary-items/{id}/participants
//! PUT    /api/v1/itinerary-items/{id}/invitation
//! DELETE /api/v1/itinerary-items/{id}/participation
//! GET    /api/v1/invitations
//! ```
//!
//! Both resource kinds share one lifecycle, so each pair of handlers only
//! differs in how the path identifier becomes a [`SharedResource`].

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, InvitationResponse, Participant, ParticipantStatus, PendingInvitation, SharedResource,
    UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::itinerary_items::parse_item_id;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::trips::parse_trip_id;
use crate::inbound::http::validation::{FieldName, parse_email};

/// Public identity of another user.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "email")]
    pub email: String,
    pub given_name: String,
    pub family_name: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            email: summary.email.into(),
            given_name: summary.given_name,
            family_name: summary.family_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub user: UserSummaryResponse,
    pub status: ParticipantStatus,
    #[schema(format = "date-time")]
    pub invited_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self {
            user: UserSummaryResponse::from(participant.user),
            status: participant.status,
            invited_at: participant.invited_at.to_rfc3339(),
            updated_at: participant.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListParticipantsResponse {
    pub participants: Vec<ParticipantResponse>,
}

/// Kind of shared resource on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Trip,
    ItineraryItem,
}

/// Invitation awaiting the caller's answer.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitationResponse {
    pub resource_type: ResourceType,
    #[schema(format = "uuid")]
    pub resource_id: String,
    /// Trip name, or item type for itinerary items.
    pub title: String,
    pub inviter: UserSummaryResponse,
    #[schema(format = "date-time")]
    pub invited_at: String,
}

impl From<PendingInvitation> for PendingInvitationResponse {
    fn from(invitation: PendingInvitation) -> Self {
        let (resource_type, resource_id) = match invitation.resource {
            SharedResource::Trip(id) => (ResourceType::Trip, id.to_string()),
            SharedResource::ItineraryItem(id) => (ResourceType::ItineraryItem, id.to_string()),
        };
        Self {
            resource_type,
            resource_id,
            title: invitation.title,
            inviter: UserSummaryResponse::from(invitation.inviter),
            invited_at: invitation.invited_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<PendingInvitationResponse>,
}

/// Request payload for inviting a registered user by email.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[schema(format = "email", example = "bea@example.com")]
    pub email: String,
}

/// Answer to a pending invitation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub status: InvitationResponse,
}

/// Participant status after answering.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondResponse {
    pub status: ParticipantStatus,
}

fn trip_resource(raw: String) -> Result<SharedResource, Error> {
    parse_trip_id(raw).map(SharedResource::Trip)
}

fn item_resource(raw: String) -> Result<SharedResource, Error> {
    parse_item_id(raw).map(SharedResource::ItineraryItem)
}

async fn invite(
    state: &HttpState,
    caller: &AuthenticatedUser,
    resource: SharedResource,
    body: InviteRequest,
) -> ApiResult<HttpResponse> {
    let email = parse_email(body.email, FieldName::new("email"))?;
    let participant = state.sharing.invite(caller.id(), &resource, &email).await?;
    Ok(HttpResponse::Created().json(ParticipantResponse::from(participant)))
}

async fn participants(
    state: &HttpState,
    caller: &AuthenticatedUser,
    resource: SharedResource,
) -> ApiResult<web::Json<ListParticipantsResponse>> {
    let participants = state
        .sharing_query
        .list_participants(caller.id(), &resource)
        .await?;
    Ok(web::Json(ListParticipantsResponse {
        participants: participants
            .into_iter()
            .map(ParticipantResponse::from)
            .collect(),
    }))
}

async fn respond(
    state: &HttpState,
    caller: &AuthenticatedUser,
    resource: SharedResource,
    body: RespondRequest,
) -> ApiResult<web::Json<RespondResponse>> {
    let status = state
        .sharing
        .respond(caller.id(), &resource, body.status)
        .await?;
    Ok(web::Json(RespondResponse { status }))
}

async fn leave(
    state: &HttpState,
    caller: &AuthenticatedUser,
    resource: SharedResource,
) -> ApiResult<HttpResponse> {
    state.sharing.leave(caller.id(), &resource).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Invite a registered user to a trip. Only the trip owner may invite.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{id}/participants",
    params(("id" = String, Path, description = "Trip identifier")),
    request_body = InviteRequest,
    responses(
        (status = 201, description = "Invitation created", body = ParticipantResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the trip", body = Error),
        (status = 404, description = "Trip or invitee not found", body = Error),
        (status = 409, description = "Self-invitation or existing participant record", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "inviteToTrip",
    security(("BearerAuth" = []))
)]
#[post("/trips/{id}/participants")]
pub async fn invite_to_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<InviteRequest>,
) -> ApiResult<HttpResponse> {
    let resource = trip_resource(path.into_inner())?;
    invite(&state, &caller, resource, payload.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}/participants",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Participants", body = ListParticipantsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "listTripParticipants",
    security(("BearerAuth" = []))
)]
#[get("/trips/{id}/participants")]
pub async fn list_trip_participants(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListParticipantsResponse>> {
    let resource = trip_resource(path.into_inner())?;
    participants(&state, &caller, resource).await
}

/// Accept or decline a pending trip invitation.
#[utoipa::path(
    put,
    path = "/api/v1/trips/{id}/invitation",
    params(("id" = String, Path, description = "Trip identifier")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Invitation answered", body = RespondResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Invitation is not pending", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "respondToTripInvite",
    security(("BearerAuth" = []))
)]
#[put("/trips/{id}/invitation")]
pub async fn respond_to_trip_invitation(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<RespondResponse>> {
    let resource = trip_resource(path.into_inner())?;
    respond(&state, &caller, resource, payload.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/trips/{id}/participation",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 204, description = "Left the trip"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Caller has not joined the trip", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "leaveTrip",
    security(("BearerAuth" = []))
)]
#[delete("/trips/{id}/participation")]
pub async fn leave_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let resource = trip_resource(path.into_inner())?;
    leave(&state, &caller, resource).await
}

/// Share a single itinerary item with a registered user.
#[utoipa::path(
    post,
    path = "/api/v1/itinerary-items/{id}/participants",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = InviteRequest,
    responses(
        (status = 201, description = "Invitation created", body = ParticipantResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the item", body = Error),
        (status = 404, description = "Item or invitee not found", body = Error),
        (status = 409, description = "Self-invitation or existing participant record", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "inviteToItineraryItem",
    security(("BearerAuth" = []))
)]
#[post("/itinerary-items/{id}/participants")]
pub async fn invite_to_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<InviteRequest>,
) -> ApiResult<HttpResponse> {
    let resource = item_resource(path.into_inner())?;
    invite(&state, &caller, resource, payload.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/itinerary-items/{id}/participants",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Participants", body = ListParticipantsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "listItineraryItemParticipants",
    security(("BearerAuth" = []))
)]
#[get("/itinerary-items/{id}/participants")]
pub async fn list_item_participants(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListParticipantsResponse>> {
    let resource = item_resource(path.into_inner())?;
    participants(&state, &caller, resource).await
}

#[utoipa::path(
    put,
    path = "/api/v1/itinerary-items/{id}/invitation",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Invitation answered", body = RespondResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error),
        (status = 409, description = "Invitation is not pending", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "respondToItineraryItemInvite",
    security(("BearerAuth" = []))
)]
#[put("/itinerary-items/{id}/invitation")]
pub async fn respond_to_item_invitation(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<RespondResponse>> {
    let resource = item_resource(path.into_inner())?;
    respond(&state, &caller, resource, payload.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/itinerary-items/{id}/participation",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Left the item"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error),
        (status = 409, description = "Caller has not joined the item", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "leaveItineraryItem",
    security(("BearerAuth" = []))
)]
#[delete("/itinerary-items/{id}/participation")]
pub async fn leave_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let resource = item_resource(path.into_inner())?;
    leave(&state, &caller, resource).await
}

/// Invitations awaiting the caller's answer, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/invitations",
    responses(
        (status = 200, description = "Pending invitations", body = ListInvitationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "listPendingInvitations",
    security(("BearerAuth" = []))
)]
#[get("/invitations")]
pub async fn list_invitations(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ListInvitationsResponse>> {
    let invitations = state.sharing_query.pending_invitations(caller.id()).await?;
    Ok(web::Json(ListInvitationsResponse {
        invitations: invitations
            .into_iter()
            .map(PendingInvitationResponse::from)
            .collect(),
    }))
}

#[cfg(test)]
#[path = "sharing_tests.rs"]
mod tests;
