//! Kind-specific itinerary details and their canonical sort anchors.
//!
//! | kind | sort anchor |
//! |------|-------------|
//! | flight | `departure_datetime` |
//! | ground transportation | `departure_datetime` |
//! | car rental | `pickup_datetime` |
//! | accommodation | `check_in_datetime` |
//! | activity | `start_datetime` |

use chrono::{DateTime, Utc};

use super::fields::{DetailsError, FieldMap, FieldReader, FieldWriter, ensure_ordered};
use super::kind::ItemKind;

/// Scheduled flight between two airports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDetails {
    pub origin_airport_code: String,
    pub destination_airport_code: String,
    pub departure_datetime: DateTime<Utc>,
    pub arrival_datetime: DateTime<Utc>,
    pub transport_carrier: Option<String>,
    pub transport_number: Option<String>,
}

/// Train, bus, ferry, or transfer leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTransportationDetails {
    pub origin_detail: String,
    pub destination_detail: String,
    pub departure_datetime: DateTime<Utc>,
    pub arrival_datetime: DateTime<Utc>,
    pub transport_carrier: Option<String>,
    pub transport_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarRentalDetails {
    pub pickup_location: String,
    /// Defaults to the pickup location when absent.
    pub dropoff_location: Option<String>,
    pub pickup_datetime: DateTime<Utc>,
    pub dropoff_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccommodationDetails {
    pub address: String,
    pub check_in_datetime: DateTime<Utc>,
    pub check_out_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDetails {
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
}

/// Tagged union of itinerary item details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetails {
    Flight(FlightDetails),
    GroundTransportation(GroundTransportationDetails),
    CarRental(CarRentalDetails),
    Accommodation(AccommodationDetails),
    Activity(ActivityDetails),
}

const FLIGHT_FIELDS: &[&str] = &[
    "origin_airport_code",
    "destination_airport_code",
    "departure_datetime",
    "arrival_datetime",
    "transport_carrier",
    "transport_number",
];

const GROUND_FIELDS: &[&str] = &[
    "origin_detail",
    "destination_detail",
    "departure_datetime",
    "arrival_datetime",
    "transport_carrier",
    "transport_number",
];

const CAR_RENTAL_FIELDS: &[&str] = &[
    "pickup_location",
    "dropoff_location",
    "pickup_datetime",
    "dropoff_datetime",
];

const ACCOMMODATION_FIELDS: &[&str] = &["address", "check_in_datetime", "check_out_datetime"];

const ACTIVITY_FIELDS: &[&str] = &[
    "description",
    "location_name",
    "start_datetime",
    "end_datetime",
];

impl ItemDetails {
    /// Validate `fields` against the requirements of `kind`.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use tripshare::domain::{ItemDetails, ItemKind};
    ///
    /// let fields = json!({
    ///     "origin_airport_code": "lhr",
    ///     "destination_airport_code": "JFK",
    ///     "departure_datetime": "2025-03-01T10:00:00Z",
    ///     "arrival_datetime": "2025-03-01T14:00:00Z",
    /// });
    /// let details = ItemDetails::from_fields(ItemKind::Flight, fields.as_object().unwrap())
    ///     .expect("valid flight");
    /// assert_eq!(details.sort_timestamp().to_rfc3339(), "2025-03-01T10:00:00+00:00");
    /// ```
    pub fn from_fields(kind: ItemKind, fields: &FieldMap) -> Result<Self, DetailsError> {
        let reader = FieldReader::new(fields);
        match kind {
            ItemKind::Flight => read_flight(&reader).map(Self::Flight),
            ItemKind::GroundTransportation => read_ground(&reader).map(Self::GroundTransportation),
            ItemKind::CarRental => read_car_rental(&reader).map(Self::CarRental),
            ItemKind::Accommodation => read_accommodation(&reader).map(Self::Accommodation),
            ItemKind::Activity => read_activity(&reader).map(Self::Activity),
        }
    }

    /// Parse the tag and validate `fields` in one step.
    pub fn from_tagged_fields(tag: &str, fields: &FieldMap) -> Result<Self, DetailsError> {
        Self::from_fields(tag.parse()?, fields)
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Flight(_) => ItemKind::Flight,
            Self::GroundTransportation(_) => ItemKind::GroundTransportation,
            Self::CarRental(_) => ItemKind::CarRental,
            Self::Accommodation(_) => ItemKind::Accommodation,
            Self::Activity(_) => ItemKind::Activity,
        }
    }

    /// Canonical instant used to order itinerary items.
    #[must_use]
    pub const fn sort_timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Flight(flight) => flight.departure_datetime,
            Self::GroundTransportation(leg) => leg.departure_datetime,
            Self::CarRental(rental) => rental.pickup_datetime,
            Self::Accommodation(stay) => stay.check_in_datetime,
            Self::Activity(activity) => activity.start_datetime,
        }
    }

    /// Field map accepted back by [`ItemDetails::from_fields`].
    #[must_use]
    pub fn to_fields(&self) -> FieldMap {
        let writer = FieldWriter::default();
        match self {
            Self::Flight(flight) => writer
                .text("origin_airport_code", &flight.origin_airport_code)
                .text("destination_airport_code", &flight.destination_airport_code)
                .timestamp("departure_datetime", flight.departure_datetime)
                .timestamp("arrival_datetime", flight.arrival_datetime)
                .optional_text("transport_carrier", flight.transport_carrier.as_deref())
                .optional_text("transport_number", flight.transport_number.as_deref()),
            Self::GroundTransportation(leg) => writer
                .text("origin_detail", &leg.origin_detail)
                .text("destination_detail", &leg.destination_detail)
                .timestamp("departure_datetime", leg.departure_datetime)
                .timestamp("arrival_datetime", leg.arrival_datetime)
                .optional_text("transport_carrier", leg.transport_carrier.as_deref())
                .optional_text("transport_number", leg.transport_number.as_deref()),
            Self::CarRental(rental) => writer
                .text("pickup_location", &rental.pickup_location)
                .optional_text("dropoff_location", rental.dropoff_location.as_deref())
                .timestamp("pickup_datetime", rental.pickup_datetime)
                .timestamp("dropoff_datetime", rental.dropoff_datetime),
            Self::Accommodation(stay) => writer
                .text("address", &stay.address)
                .timestamp("check_in_datetime", stay.check_in_datetime)
                .timestamp("check_out_datetime", stay.check_out_datetime),
            Self::Activity(activity) => writer
                .optional_text("description", activity.description.as_deref())
                .optional_text("location_name", activity.location_name.as_deref())
                .timestamp("start_datetime", activity.start_datetime)
                .optional_timestamp("end_datetime", activity.end_datetime),
        }
        .finish()
    }
}

fn read_flight(reader: &FieldReader<'_>) -> Result<FlightDetails, DetailsError> {
    reader.ensure_known(FLIGHT_FIELDS)?;
    let details = FlightDetails {
        origin_airport_code: reader.airport_code("origin_airport_code")?,
        destination_airport_code: reader.airport_code("destination_airport_code")?,
        departure_datetime: reader.required_timestamp("departure_datetime")?,
        arrival_datetime: reader.required_timestamp("arrival_datetime")?,
        transport_carrier: reader.text("transport_carrier")?,
        transport_number: reader.text("transport_number")?,
    };
    ensure_ordered(
        details.departure_datetime,
        details.arrival_datetime,
        "departure_datetime",
        "arrival_datetime",
    )?;
    Ok(details)
}

fn read_ground(reader: &FieldReader<'_>) -> Result<GroundTransportationDetails, DetailsError> {
    reader.ensure_known(GROUND_FIELDS)?;
    let details = GroundTransportationDetails {
        origin_detail: reader.required_text("origin_detail")?,
        destination_detail: reader.required_text("destination_detail")?,
        departure_datetime: reader.required_timestamp("departure_datetime")?,
        arrival_datetime: reader.required_timestamp("arrival_datetime")?,
        transport_carrier: reader.text("transport_carrier")?,
        transport_number: reader.text("transport_number")?,
    };
    ensure_ordered(
        details.departure_datetime,
        details.arrival_datetime,
        "departure_datetime",
        "arrival_datetime",
    )?;
    Ok(details)
}

fn read_car_rental(reader: &FieldReader<'_>) -> Result<CarRentalDetails, DetailsError> {
    reader.ensure_known(CAR_RENTAL_FIELDS)?;
    let details = CarRentalDetails {
        pickup_location: reader.required_text("pickup_location")?,
        dropoff_location: reader.text("dropoff_location")?,
        pickup_datetime: reader.required_timestamp("pickup_datetime")?,
        dropoff_datetime: reader.required_timestamp("dropoff_datetime")?,
    };
    ensure_ordered(
        details.pickup_datetime,
        details.dropoff_datetime,
        "pickup_datetime",
        "dropoff_datetime",
    )?;
    Ok(details)
}

fn read_accommodation(reader: &FieldReader<'_>) -> Result<AccommodationDetails, DetailsError> {
    reader.ensure_known(ACCOMMODATION_FIELDS)?;
    let details = AccommodationDetails {
        address: reader.required_text("address")?,
        check_in_datetime: reader.required_timestamp("check_in_datetime")?,
        check_out_datetime: reader.required_timestamp("check_out_datetime")?,
    };
    ensure_ordered(
        details.check_in_datetime,
        details.check_out_datetime,
        "check_in_datetime",
        "check_out_datetime",
    )?;
    Ok(details)
}

fn read_activity(reader: &FieldReader<'_>) -> Result<ActivityDetails, DetailsError> {
    reader.ensure_known(ACTIVITY_FIELDS)?;
    let details = ActivityDetails {
        description: reader.text("description")?,
        location_name: reader.text("location_name")?,
        start_datetime: reader.required_timestamp("start_datetime")?,
        end_datetime: reader.timestamp("end_datetime")?,
    };
    if let Some(end) = details.end_datetime {
        ensure_ordered(details.start_datetime, end, "start_datetime", "end_datetime")?;
    }
    Ok(details)
}

#[cfg(test)]
#[path = "details_tests.rs"]
mod tests;
