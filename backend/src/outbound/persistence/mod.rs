//! PostgreSQL persistence adapters built on Diesel.
//!
//! Each repository implements one domain port on top of a shared
//! [`DbPool`]. Row structs and the table schema stay private to this module.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between rows and domain types
//!   and hold no business rules. Access decisions happen in the domain.
//! - **Validated loads**: rows are parsed back into domain types on read, so
//!   a bad row surfaces as an error instead of leaking invalid state.
//! - **Atomic cascades**: trip and item deletion run in a transaction together
//!   with their participant rows.
//!
//! # Example
//!
//! ```ignore
//! use tripshare::outbound::persistence::{DbPool, DieselTripRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tripshare")).await?;
//! let trips = DieselTripRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_itinerary_repository;
mod diesel_participant_repository;
mod diesel_trip_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_itinerary_repository::DieselItineraryRepository;
pub use diesel_participant_repository::DieselParticipantRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
