//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, their
//! request and response schemas, and the bearer authentication scheme. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Error, ErrorCode, InvitationResponse, ItemKind, ParticipantStatus, UserStatus,
};
use crate::inbound::http::itinerary_items::{
    CreateItineraryItemRequest, ItineraryItemResponse, ListItineraryItemsResponse,
    UpdateItineraryItemRequest,
};
use crate::inbound::http::sharing::{
    InviteRequest, ListInvitationsResponse, ListParticipantsResponse, ParticipantResponse,
    PendingInvitationResponse, ResourceType, RespondRequest, RespondResponse, UserSummaryResponse,
};
use crate::inbound::http::trips::{
    CreateTripRequest, ListTripsResponse, TripDetailsResponse, TripResponse, UpdateTripRequest,
};
use crate::inbound::http::users::{SignInResponse, UserResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Access token issued by the identity provider for the app's client.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tripshare API",
        description = "Trips, itinerary items, and sharing for authenticated travellers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::sign_in,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::itinerary_items::create_item,
        crate::inbound::http::itinerary_items::list_items,
        crate::inbound::http::itinerary_items::get_item,
        crate::inbound::http::itinerary_items::update_item,
        crate::inbound::http::itinerary_items::delete_item,
        crate::inbound::http::sharing::invite_to_trip,
        crate::inbound::http::sharing::list_trip_participants,
        crate::inbound::http::sharing::respond_to_trip_invitation,
        crate::inbound::http::sharing::leave_trip,
        crate::inbound::http::sharing::invite_to_item,
        crate::inbound::http::sharing::list_item_participants,
        crate::inbound::http::sharing::respond_to_item_invitation,
        crate::inbound::http::sharing::leave_item,
        crate::inbound::http::sharing::list_invitations,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserStatus,
        ItemKind,
        ParticipantStatus,
        InvitationResponse,
        ResourceType,
        UserResponse,
        SignInResponse,
        UserSummaryResponse,
        TripResponse,
        ListTripsResponse,
        TripDetailsResponse,
        CreateTripRequest,
        UpdateTripRequest,
        ItineraryItemResponse,
        ListItineraryItemsResponse,
        CreateItineraryItemRequest,
        UpdateItineraryItemRequest,
        InviteRequest,
        RespondRequest,
        RespondResponse,
        ParticipantResponse,
        ListParticipantsResponse,
        PendingInvitationResponse,
        ListInvitationsResponse,
    )),
    tags(
        (name = "users", description = "Sign-in and account provisioning"),
        (name = "trips", description = "Trips owned by or shared with the caller"),
        (name = "itinerary", description = "Bookings and plans within trips"),
        (name = "sharing", description = "Invitations and participation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
