//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::User;
use crate::domain::ports::{
    MockAuthenticator, MockItineraryCommand, MockItineraryQuery, MockSharingCommand,
    MockSharingQuery, MockTripCommand, MockTripQuery,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{json_config, query_config};

/// Token accepted by [`MockPorts::signed_in`].
pub const TEST_TOKEN: &str = "Bearer test-token";

/// Mock implementations of every driving port.
#[derive(Default)]
pub struct MockPorts {
    pub authenticator: MockAuthenticator,
    pub trips: MockTripCommand,
    pub trips_query: MockTripQuery,
    pub itinerary: MockItineraryCommand,
    pub itinerary_query: MockItineraryQuery,
    pub sharing: MockSharingCommand,
    pub sharing_query: MockSharingQuery,
}

impl MockPorts {
    /// Ports whose authenticator resolves any credential to `user`.
    pub fn signed_in(user: &User) -> Self {
        let mut ports = Self::default();
        let user = user.clone();
        ports
            .authenticator
            .expect_authenticate()
            .returning(move |_| Ok(user.clone()));
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            authenticator: Arc::new(self.authenticator),
            trips: Arc::new(self.trips),
            trips_query: Arc::new(self.trips_query),
            itinerary: Arc::new(self.itinerary),
            itinerary_query: Arc::new(self.itinerary_query),
            sharing: Arc::new(self.sharing),
            sharing_query: Arc::new(self.sharing_query),
        }
    }
}

/// Build an app serving `configure`'s handlers under `/api/v1`.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .service(web::scope("/api/v1").configure(configure))
}
