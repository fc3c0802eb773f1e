//! Trip HTTP handlers.
//!
//! ```text
//! POST   /api/v1/trips
//! GET    /api/v1/trips?futureOnly=
//! GET    /api/v1/trips/{id}
//! PATCH  /api/v1/trips/{id}
//! DELETE /api/v1/trips/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::TripDetails;
use crate::domain::trip_service::map_trip_validation_error;
use crate::domain::{Error, Trip, TripDraft, TripId, TripName, TripPatch, TripSchedule};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::itinerary_items::ItineraryItemResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, nullable, parse_optional_rfc3339_timestamp, parse_uuid,
};

/// Trip as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(format = "date-time")]
    pub start_date: Option<String>,
    #[schema(format = "date-time")]
    pub end_date: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            owner_id: trip.owner_id.to_string(),
            name: trip.name.into(),
            description: trip.description,
            start_date: trip.start_date.map(|at| at.to_rfc3339()),
            end_date: trip.end_date.map(|at| at.to_rfc3339()),
            created_at: trip.created_at.to_rfc3339(),
            updated_at: trip.updated_at.to_rfc3339(),
        }
    }
}

/// Trip listing.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsResponse {
    pub trips: Vec<TripResponse>,
}

/// A trip together with its itinerary in chronological order.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailsResponse {
    pub trip: TripResponse,
    pub items: Vec<ItineraryItemResponse>,
}

impl From<TripDetails> for TripDetailsResponse {
    fn from(details: TripDetails) -> Self {
        Self {
            trip: TripResponse::from(details.trip),
            items: details
                .items
                .into_iter()
                .map(ItineraryItemResponse::from)
                .collect(),
        }
    }
}

/// Request payload for creating a trip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[schema(example = "Lisbon long weekend")]
    pub name: String,
    pub description: Option<String>,
    #[schema(format = "date-time")]
    pub start_date: Option<String>,
    #[schema(format = "date-time")]
    pub end_date: Option<String>,
}

/// Partial trip update. Nullable properties set to `null` are cleared.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub end_date: Option<Option<String>>,
}

/// Query string for trip listings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsQuery {
    #[serde(default)]
    pub future_only: bool,
}

pub(crate) fn parse_trip_id(raw: String) -> Result<TripId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(TripId::from_uuid)
}

fn parse_trip_draft(body: CreateTripRequest) -> Result<TripDraft, Error> {
    let name = TripName::new(&body.name).map_err(map_trip_validation_error)?;
    let start = parse_optional_rfc3339_timestamp(body.start_date, FieldName::new("startDate"))?;
    let end = parse_optional_rfc3339_timestamp(body.end_date, FieldName::new("endDate"))?;
    let schedule = TripSchedule::new(start, end).map_err(map_trip_validation_error)?;
    Ok(TripDraft {
        name,
        description: body.description,
        schedule,
    })
}

fn parse_trip_patch(body: UpdateTripRequest) -> Result<TripPatch, Error> {
    let name = body
        .name
        .map(|raw| TripName::new(raw).map_err(map_trip_validation_error))
        .transpose()?;
    let start_date = body
        .start_date
        .map(|raw| parse_optional_rfc3339_timestamp(raw, FieldName::new("startDate")))
        .transpose()?;
    let end_date = body
        .end_date
        .map(|raw| parse_optional_rfc3339_timestamp(raw, FieldName::new("endDate")))
        .transpose()?;
    Ok(TripPatch {
        name,
        description: body.description,
        start_date,
        end_date,
    })
}

/// Create a trip owned by the caller.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use tripshare::inbound::http::ApiResult;
/// use tripshare::inbound::http::auth::AuthenticatedUser;
/// use tripshare::inbound::http::state::HttpState;
/// use tripshare::inbound::http::trips::{CreateTripRequest, create_trip};
///
/// async fn call_handler(
///     state: web::Data<HttpState>,
///     caller: AuthenticatedUser,
/// ) -> ApiResult<actix_web::HttpResponse> {
///     let payload = web::Json(CreateTripRequest {
///         name: "Lisbon long weekend".to_owned(),
///         description: None,
///         start_date: Some("2025-06-12T00:00:00Z".to_owned()),
///         end_date: Some("2025-06-15T00:00:00Z".to_owned()),
///     });
///     create_trip(state, caller, payload).await
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = TripResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["trips"],
    operation_id = "createTrip",
    security(("BearerAuth" = []))
)]
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_trip_draft(payload.into_inner())?;
    let trip = state.trips.create_trip(caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(TripResponse::from(trip)))
}

/// List trips the caller owns or participates in, earliest first with
/// undated trips last.
#[utoipa::path(
    get,
    path = "/api/v1/trips",
    params(
        ("futureOnly" = Option<bool>, Query, description = "Only trips starting now or later")
    ),
    responses(
        (status = 200, description = "Trips", body = ListTripsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["trips"],
    operation_id = "listTrips",
    security(("BearerAuth" = []))
)]
#[get("/trips")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<ListTripsQuery>,
) -> ApiResult<web::Json<ListTripsResponse>> {
    let trips = state
        .trips_query
        .list_trips(caller.id(), query.future_only)
        .await?;
    Ok(web::Json(ListTripsResponse {
        trips: trips.into_iter().map(TripResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip with its itinerary", body = TripDetailsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "getTripDetails",
    security(("BearerAuth" = []))
)]
#[get("/trips/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripDetailsResponse>> {
    let id = parse_trip_id(path.into_inner())?;
    let details = state.trips_query.trip_details(caller.id(), &id).await?;
    Ok(web::Json(TripDetailsResponse::from(details)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated", body = TripResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "updateTrip",
    security(("BearerAuth" = []))
)]
#[patch("/trips/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let id = parse_trip_id(path.into_inner())?;
    let patch = parse_trip_patch(payload.into_inner())?;
    let trip = state.trips.update_trip(caller.id(), &id, patch).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Delete a trip. Its items are detached rather than deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 204, description = "Trip deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only the owner may delete", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip",
    security(("BearerAuth" = []))
)]
#[delete("/trips/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_trip_id(path.into_inner())?;
    state.trips.delete_trip(caller.id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "trips_tests.rs"]
mod tests;
