//! Itinerary items: bookings and plans that may belong to a trip.
//!
//! Items are a tagged union over five kinds. Kind-specific fields travel as a
//! JSON field map at the edges and are validated into [`ItemDetails`] before
//! they reach storage.

mod details;
mod fields;
mod item;
mod kind;

pub use self::details::{
    AccommodationDetails, ActivityDetails, CarRentalDetails, FlightDetails,
    GroundTransportationDetails, ItemDetails,
};
pub use self::fields::{DetailsError, FieldMap};
pub use self::item::{BookingUrl, ItemDraft, ItemPatch, ItemValidationError, ItineraryItem};
pub use self::kind::ItemKind;
