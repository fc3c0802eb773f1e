//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON payloads into domain values, call the driving
//! ports held in [`state::HttpState`], and map results back to JSON. Every
//! `/api/v1` route except sign-in resolves the caller through the
//! [`auth::AuthenticatedUser`] extractor.

pub mod auth;
pub mod error;
pub mod health;
pub mod itinerary_items;
pub mod sharing;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod users;
pub mod validation;

use actix_web::web;
use serde_json::json;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor configuration reporting malformed bodies as `invalid_request`.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
            .into()
    })
}

/// Query extractor configuration reporting malformed query strings as
/// `invalid_request`.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}"))
            .with_details(json!({ "code": "invalid_query" }))
            .into()
    })
}

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use tripshare::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::sign_in)
        .service(trips::create_trip)
        .service(trips::list_trips)
        .service(trips::get_trip)
        .service(trips::update_trip)
        .service(trips::delete_trip)
        .service(sharing::invite_to_trip)
        .service(sharing::list_trip_participants)
        .service(sharing::respond_to_trip_invitation)
        .service(sharing::leave_trip)
        .service(itinerary_items::create_item)
        .service(itinerary_items::list_items)
        .service(itinerary_items::get_item)
        .service(itinerary_items::update_item)
        .service(itinerary_items::delete_item)
        .service(sharing::invite_to_item)
        .service(sharing::list_item_participants)
        .service(sharing::respond_to_item_invitation)
        .service(sharing::leave_item)
        .service(sharing::list_invitations);
}
