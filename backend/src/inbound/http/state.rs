//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Authenticator, ItineraryCommand, ItineraryQuery, SharingCommand, SharingQuery, TripCommand,
    TripQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub authenticator: Arc<dyn Authenticator>,
    pub trips: Arc<dyn TripCommand>,
    pub trips_query: Arc<dyn TripQuery>,
    pub itinerary: Arc<dyn ItineraryCommand>,
    pub itinerary_query: Arc<dyn ItineraryQuery>,
    pub sharing: Arc<dyn SharingCommand>,
    pub sharing_query: Arc<dyn SharingQuery>,
}
