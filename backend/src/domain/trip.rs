//! Trips: a member's dated plan to visit a destination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityWithType, BookingWithType, Destination, DestinationSummary, UserId, UserSummary};

/// `trips` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Row id.
    pub id: Uuid,
    /// Owner.
    pub user_id: UserId,
    /// Destination visited.
    pub destination_id: Uuid,
    /// Departure.
    pub start_date: DateTime<Utc>,
    /// Return.
    pub end_date: DateTime<Utc>,
    /// Planned spend.
    #[serde(default)]
    pub budget: Option<f64>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Visible to other members.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Whether `viewer` may read this trip.
    #[must_use]
    pub fn visible_to(&self, viewer: &UserId) -> bool {
        self.is_public || &self.user_id == viewer
    }
}

/// Trip as returned by listings, with destination and owner badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripListing {
    /// The trip row.
    #[serde(flatten)]
    pub trip: Trip,
    /// Destination badge.
    #[serde(default)]
    pub destinations: Option<DestinationSummary>,
    /// Owner badge.
    #[serde(default)]
    pub users: Option<UserSummary>,
}

/// Trip with its destination badge, as embedded under bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripWithDestination {
    /// The trip row.
    #[serde(flatten)]
    pub trip: Trip,
    /// Destination badge.
    #[serde(default)]
    pub destinations: Option<super::DestinationRef>,
}

/// Trip with its full destination, owner, bookings and booked activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetail {
    /// The trip row.
    #[serde(flatten)]
    pub trip: Trip,
    /// Full destination row.
    #[serde(default)]
    pub destinations: Option<Destination>,
    /// Owner badge.
    #[serde(default)]
    pub users: Option<UserSummary>,
    /// Activities referenced by the trip's bookings.
    #[serde(default)]
    pub activities: Vec<ActivityWithType>,
    /// Bookings attached to the trip.
    #[serde(default)]
    pub bookings: Vec<BookingWithType>,
}

/// Validated input for a new trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrip {
    /// Owner.
    pub user_id: UserId,
    /// Destination.
    pub destination_id: Uuid,
    /// Departure.
    pub start_date: DateTime<Utc>,
    /// Return.
    pub end_date: DateTime<Utc>,
    /// Planned spend, `0` when omitted.
    pub budget: f64,
    /// Notes, empty when omitted.
    pub notes: String,
    /// Visibility, private when omitted.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial trip update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripChanges {
    /// New destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Uuid>,
    /// New departure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// New return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// New budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// New notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// Stamp applied by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TripChanges {
    /// Apply the changes to a trip in place.
    pub fn apply_to(&self, trip: &mut Trip) {
        if let Some(id) = self.destination_id {
            trip.destination_id = id;
        }
        if let Some(start) = self.start_date {
            trip.start_date = start;
        }
        if let Some(end) = self.end_date {
            trip.end_date = end;
        }
        if let Some(budget) = self.budget {
            trip.budget = Some(budget);
        }
        if let Some(notes) = &self.notes {
            trip.notes = Some(notes.clone());
        }
        if let Some(is_public) = self.is_public {
            trip.is_public = is_public;
        }
        if let Some(updated_at) = self.updated_at {
            trip.updated_at = Some(updated_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn trip() -> Trip {
        Trip {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            destination_id: Uuid::new_v4(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            budget: Some(0.0),
            notes: Some(String::new()),
            is_public: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[rstest]
    fn private_trips_are_visible_only_to_their_owner(trip: Trip) {
        assert!(trip.visible_to(&trip.user_id));
        assert!(!trip.visible_to(&UserId::random()));
    }

    #[rstest]
    fn public_trips_are_visible_to_anyone(mut trip: Trip) {
        trip.is_public = true;
        assert!(trip.visible_to(&UserId::random()));
    }

    #[rstest]
    fn changes_serialise_only_present_fields() {
        let changes = TripChanges {
            notes: Some("pack light".to_owned()),
            ..TripChanges::default()
        };
        let value = serde_json::to_value(changes).expect("encodes");
        assert_eq!(value, json!({ "notes": "pack light" }));
    }

    #[rstest]
    fn changes_leave_absent_fields_untouched(mut trip: Trip) {
        let original_start = trip.start_date;
        TripChanges {
            budget: Some(1200.0),
            is_public: Some(true),
            ..TripChanges::default()
        }
        .apply_to(&mut trip);
        assert_eq!(trip.budget, Some(1200.0));
        assert!(trip.is_public);
        assert_eq!(trip.start_date, original_start);
    }
}
