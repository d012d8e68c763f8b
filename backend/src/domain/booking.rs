//! Bookings: reservations attached to a trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::double_option;
use super::{ActivityWithType, CategoryType, TripWithDestination, TypeBadge, UserId};

/// Status applied to new bookings when the caller does not supply one.
pub const DEFAULT_BOOKING_STATUS: &str = "confirmed";

/// `booking_types` row.
pub type BookingType = CategoryType;

/// `bookings` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Row id.
    pub id: Uuid,
    /// Owner.
    pub user_id: UserId,
    /// Trip the booking belongs to.
    pub trip_id: Uuid,
    /// Booking category.
    pub type_id: Uuid,
    /// Booked activity, if any.
    #[serde(default)]
    pub activity_id: Option<Uuid>,
    /// Airline, hotel or operator.
    #[serde(default)]
    pub provider_name: Option<String>,
    /// Provider confirmation code.
    #[serde(default)]
    pub booking_reference: Option<String>,
    /// When the booking was made.
    pub booking_date: DateTime<Utc>,
    /// Service start.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Service end.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Amount paid.
    pub amount: f64,
    /// Currency of `amount`.
    pub currency: String,
    /// Free-form status such as `confirmed` or `cancelled`.
    pub status: String,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Booking with its `booking_types(name,icon)` embed, as listed under a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithType {
    /// The booking row.
    #[serde(flatten)]
    pub booking: Booking,
    /// Category badge.
    #[serde(default)]
    pub booking_types: Option<TypeBadge>,
}

/// Booking with its category, trip and activity embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingView {
    /// The booking row.
    #[serde(flatten)]
    pub booking: Booking,
    /// Full category row.
    #[serde(default)]
    pub booking_types: Option<BookingType>,
    /// Trip with its destination badge.
    #[serde(default)]
    pub trips: Option<TripWithDestination>,
    /// Booked activity with its category badge.
    #[serde(default)]
    pub activities: Option<ActivityWithType>,
}

/// Filters for the caller's booking listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Exact status match.
    pub status: Option<String>,
    /// Restrict to one category.
    pub type_id: Option<Uuid>,
}

impl BookingFilter {
    /// Evaluate the filter against a row.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status
            .as_deref()
            .is_none_or(|status| booking.status == status)
            && self.type_id.is_none_or(|id| booking.type_id == id)
    }
}

/// Validated input for a new booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBooking {
    /// Owner.
    pub user_id: UserId,
    /// Trip.
    pub trip_id: Uuid,
    /// Category.
    pub type_id: Uuid,
    /// Booked activity.
    pub activity_id: Option<Uuid>,
    /// Provider.
    pub provider_name: Option<String>,
    /// Confirmation code.
    pub booking_reference: Option<String>,
    /// When booked.
    pub booking_date: DateTime<Utc>,
    /// Service start.
    pub start_date: Option<DateTime<Utc>>,
    /// Service end.
    pub end_date: Option<DateTime<Utc>>,
    /// Amount.
    pub amount: f64,
    /// Currency.
    pub currency: String,
    /// Status.
    pub status: String,
    /// Notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial booking update.
///
/// Optional columns are tri-state: absent leaves the value, `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingChanges {
    /// Move to another trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<Uuid>,
    /// Change category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<Uuid>,
    /// Booked activity.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub activity_id: Option<Option<Uuid>>,
    /// Provider.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_name: Option<Option<String>>,
    /// Confirmation code.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_reference: Option<Option<String>>,
    /// When booked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<DateTime<Utc>>,
    /// Service start.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<DateTime<Utc>>>,
    /// Service end.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<DateTime<Utc>>>,
    /// Amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Notes.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    /// Stamp applied by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookingChanges {
    /// Apply the changes to a booking in place.
    pub fn apply_to(&self, booking: &mut Booking) {
        if let Some(trip_id) = self.trip_id {
            booking.trip_id = trip_id;
        }
        if let Some(type_id) = self.type_id {
            booking.type_id = type_id;
        }
        if let Some(activity_id) = self.activity_id {
            booking.activity_id = activity_id;
        }
        if let Some(provider) = &self.provider_name {
            booking.provider_name.clone_from(provider);
        }
        if let Some(reference) = &self.booking_reference {
            booking.booking_reference.clone_from(reference);
        }
        if let Some(date) = self.booking_date {
            booking.booking_date = date;
        }
        if let Some(start) = self.start_date {
            booking.start_date = start;
        }
        if let Some(end) = self.end_date {
            booking.end_date = end;
        }
        if let Some(amount) = self.amount {
            booking.amount = amount;
        }
        if let Some(currency) = &self.currency {
            booking.currency.clone_from(currency);
        }
        if let Some(status) = &self.status {
            booking.status.clone_from(status);
        }
        if let Some(notes) = &self.notes {
            booking.notes.clone_from(notes);
        }
        if let Some(updated_at) = self.updated_at {
            booking.updated_at = Some(updated_at);
        }
    }
}
