//! Itinerary item HTTP handlers.
//!
//! ```text
//! POST   /api/v1/itinerary-items
//! GET    /api/v1/itinerary-items?tripId=
//! GET    /api/v1/itinerary-items/{id}
//! PATCH  /api/v1/itinerary-items/{id}
//! DELETE /api/v1/itinerary-items/{id}
//! ```
//!
//! Kind-specific fields travel as a flat JSON object next to a `type` tag and
//! are validated into domain details before any port is called.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::itinerary_service::map_item_validation_error;
use crate::domain::{
    BookingUrl, Error, FieldMap, ItemDetails, ItemDraft, ItemKind, ItemPatch,
    ItemValidationError, ItineraryItem, ItineraryItemId, TripId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, nullable, parse_optional_uuid, parse_uuid};

/// Itinerary item as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItemResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub owner_id: String,
    #[schema(format = "uuid")]
    pub trip_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Kind-specific fields, e.g. `departure_datetime` for flights.
    #[schema(value_type = Object)]
    pub fields: FieldMap,
    /// Timestamp the item sorts by, derived from its kind.
    #[schema(format = "date-time")]
    pub sort_datetime: String,
    pub booking_reference: Option<String>,
    #[schema(format = "uri")]
    pub booking_url: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub raw_details: Option<Value>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<ItineraryItem> for ItineraryItemResponse {
    fn from(item: ItineraryItem) -> Self {
        Self {
            id: item.id.to_string(),
            owner_id: item.owner_id.to_string(),
            trip_id: item.trip_id.map(|id| id.to_string()),
            kind: item.kind(),
            fields: item.details.to_fields(),
            sort_datetime: item.details.sort_timestamp().to_rfc3339(),
            booking_reference: item.booking_reference,
            booking_url: item.booking_url.map(|url| url.as_ref().to_owned()),
            notes: item.notes,
            raw_details: item.raw_details,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

/// Item listing.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItineraryItemsResponse {
    pub items: Vec<ItineraryItemResponse>,
}

/// Request payload for creating an itinerary item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItineraryItemRequest {
    #[schema(format = "uuid")]
    pub trip_id: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "flight")]
    pub kind: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: FieldMap,
    pub booking_reference: Option<String>,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub raw_details: Option<Value>,
}

/// Partial update. Nullable properties set to `null` are cleared; a `null`
/// entry inside `fields` removes that field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItineraryItemRequest {
    #[schema(format = "uuid")]
    pub trip_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldMap>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub booking_reference: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub booking_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub raw_details: Option<Option<Value>>,
}

/// Query string for item listings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItineraryItemsQuery {
    pub trip_id: Option<String>,
}

pub(crate) fn parse_item_id(raw: String) -> Result<ItineraryItemId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(ItineraryItemId::from_uuid)
}

fn parse_trip_link(raw: Option<String>) -> Result<Option<TripId>, Error> {
    Ok(parse_optional_uuid(raw, FieldName::new("tripId"))?.map(TripId::from_uuid))
}

fn parse_kind(raw: &str) -> Result<ItemKind, Error> {
    raw.parse::<ItemKind>()
        .map_err(|error| map_item_validation_error(ItemValidationError::Details(error)))
}

fn parse_booking_url(raw: String) -> Result<BookingUrl, Error> {
    BookingUrl::new(raw).map_err(map_item_validation_error)
}

fn parse_item_draft(body: CreateItineraryItemRequest) -> Result<ItemDraft, Error> {
    let kind = parse_kind(&body.kind)?;
    let details = ItemDetails::from_fields(kind, &body.fields)
        .map_err(|error| map_item_validation_error(error.into()))?;
    Ok(ItemDraft {
        trip_id: parse_trip_link(body.trip_id)?,
        details,
        booking_reference: body.booking_reference,
        booking_url: body.booking_url.map(parse_booking_url).transpose()?,
        notes: body.notes,
        raw_details: body.raw_details,
    })
}

fn parse_item_patch(body: UpdateItineraryItemRequest) -> Result<ItemPatch, Error> {
    let booking_url = match body.booking_url {
        Some(Some(raw)) => Some(Some(parse_booking_url(raw)?)),
        Some(None) => Some(None),
        None => None,
    };
    Ok(ItemPatch {
        trip_id: parse_trip_link(body.trip_id)?,
        kind: body.kind.as_deref().map(parse_kind).transpose()?,
        fields: body.fields,
        booking_reference: body.booking_reference,
        booking_url,
        notes: body.notes,
        raw_details: body.raw_details,
    })
}

/// Create an itinerary item, optionally attached to a trip the caller can
/// access.
#[utoipa::path(
    post,
    path = "/api/v1/itinerary-items",
    request_body = CreateItineraryItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItineraryItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["itinerary"],
    operation_id = "createItineraryItem",
    security(("BearerAuth" = []))
)]
#[post("/itinerary-items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateItineraryItemRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_item_draft(payload.into_inner())?;
    let item = state.itinerary.create_item(caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(ItineraryItemResponse::from(item)))
}

/// List items visible to the caller in chronological order.
#[utoipa::path(
    get,
    path = "/api/v1/itinerary-items",
    params(
        ("tripId" = Option<String>, Query, description = "Restrict the listing to one trip")
    ),
    responses(
        (status = 200, description = "Visible items", body = ListItineraryItemsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["itinerary"],
    operation_id = "listItineraryItems",
    security(("BearerAuth" = []))
)]
#[get("/itinerary-items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<ListItineraryItemsQuery>,
) -> ApiResult<web::Json<ListItineraryItemsResponse>> {
    let trip = parse_trip_link(query.into_inner().trip_id)?;
    let items = state.itinerary_query.list_items(caller.id(), trip).await?;
    Ok(web::Json(ListItineraryItemsResponse {
        items: items.into_iter().map(ItineraryItemResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/itinerary-items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItineraryItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["itinerary"],
    operation_id = "getItineraryItem",
    security(("BearerAuth" = []))
)]
#[get("/itinerary-items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItineraryItemResponse>> {
    let id = parse_item_id(path.into_inner())?;
    let item = state.itinerary_query.get_item(caller.id(), &id).await?;
    Ok(web::Json(ItineraryItemResponse::from(item)))
}

/// Apply a partial update. Changing `type` requires a complete field set for
/// the new kind.
#[utoipa::path(
    patch,
    path = "/api/v1/itinerary-items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = UpdateItineraryItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItineraryItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["itinerary"],
    operation_id = "updateItineraryItem",
    security(("BearerAuth" = []))
)]
#[patch("/itinerary-items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateItineraryItemRequest>,
) -> ApiResult<web::Json<ItineraryItemResponse>> {
    let id = parse_item_id(path.into_inner())?;
    let patch = parse_item_patch(payload.into_inner())?;
    let item = state.itinerary.update_item(caller.id(), &id, patch).await?;
    Ok(web::Json(ItineraryItemResponse::from(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/itinerary-items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["itinerary"],
    operation_id = "deleteItineraryItem",
    security(("BearerAuth" = []))
)]
#[delete("/itinerary-items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_item_id(path.into_inner())?;
    state.itinerary.delete_item(caller.id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "itinerary_items_tests.rs"]
mod tests;
