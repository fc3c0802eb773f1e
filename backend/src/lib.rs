//! Shared trip planning backend.
//!
//! Travellers sign in with a provider-issued bearer token, organise trips and
//! itinerary items, and share either with other registered users. The crate
//! follows a hexagonal layout: [`domain`] holds entities, services, and ports,
//! [`inbound`] adapts HTTP requests onto the driving ports, and [`outbound`]
//! implements the driven ports against PostgreSQL and the identity provider.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
