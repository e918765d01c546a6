//! Users and bookings.

use super::ServiceId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A marketplace member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the user sells services.
    pub is_seller: bool,
    /// Home location label.
    pub location: String,
    /// Optional short biography.
    pub bio: Option<String>,
    /// Average rating out of 5.
    pub rating: f32,
    /// Month the user joined, e.g. "Jan 2023".
    pub joined: String,
}

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting provider confirmation.
    Pending,
    /// Provider accepted.
    Confirmed,
    /// Work delivered.
    Completed,
    /// Called off by either side.
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A booked service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id.
    pub id: String,
    /// The booked listing.
    pub service_id: ServiceId,
    /// Listing title at booking time.
    pub service_title: String,
    /// Provider display name.
    pub provider_name: String,
    /// Scheduled date.
    pub date: NaiveDate,
    /// Current status.
    pub status: BookingStatus,
    /// Agreed price.
    pub price: u64,
}
