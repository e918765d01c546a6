//! Hard-coded marketplace data.
//!
//! The storefront runs entirely on this in-memory catalog: six listings around
//! Nairobi, the signed-in user and their booking history.

use crate::models::{Booking, BookingStatus, ServiceCategory, ServiceId, ServiceRecord, User};
use crate::{Error, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

static SERVICES: Lazy<Vec<ServiceRecord>> = Lazy::new(|| {
    vec![
        ServiceRecord::new("s1", "High School Math Tutoring", ServiceCategory::Tutoring)
            .with_provider("u2", "Grace Kamau")
            .with_description(
                "Experienced math tutor specializing in KCSE preparation. I make algebra and \
                 calculus easy to understand.",
            )
            .with_price(1500, "KES")
            .with_location("Westlands, Nairobi")
            .with_rating(4.9, 42)
            .with_tags(["math", "education", "tutor", "high school"]),
        ServiceRecord::new("s2", "Expert Plumbing Services", ServiceCategory::HomeRepair)
            .with_provider("u3", "Juma Fix-It")
            .with_description(
                "Leaking taps, blocked pipes, or new installations. Fast and reliable service \
                 anywhere in Nairobi.",
            )
            .with_price(2500, "KES")
            .with_location("Nairobi CBD")
            .with_rating(4.7, 128)
            .with_tags(["plumbing", "repair", "home", "water"]),
        ServiceRecord::new(
            "s3",
            "Professional Braiding & Hair Styling",
            ServiceCategory::Beauty,
        )
        .with_provider("u4", "Sarah Styles")
        .with_description(
            "Neat and painless braiding. Knotless braids, cornrows, and dreadlocks maintenance.",
        )
        .with_price(3000, "KES")
        .with_location("Kilimani, Nairobi")
        .with_rating(5.0, 85)
        .with_tags(["beauty", "hair", "braiding", "salon"]),
        ServiceRecord::new(
            "s4",
            "Laptop Repair & Software Installation",
            ServiceCategory::Tech,
        )
        .with_provider("u5", "David Tech")
        .with_description(
            "Fixing slow laptops, virus removal, screen replacement, and Windows/Office \
             installation.",
        )
        .with_price(1000, "KES")
        .with_location("Mombasa Road, Nairobi")
        .with_rating(4.6, 30)
        .with_tags(["tech", "repair", "computer", "software"]),
        ServiceRecord::new(
            "s5",
            "Custom Graphic Design & Logos",
            ServiceCategory::Creative,
        )
        .with_provider("u6", "Art by Kemo")
        .with_description(
            "Need a logo for your business? I create professional brand identities and social \
             media flyers.",
        )
        .with_price(4000, "KES")
        .with_location("Remote")
        .with_rating(4.9, 15)
        .with_tags(["design", "logo", "branding", "creative"]),
        ServiceRecord::new("s6", "Authentic Kenyan Catering", ServiceCategory::Other)
            .with_provider("u7", "Mama Njeeri")
            .with_description(
                "Cooking service for small parties and events. Chapati, Pilau, Mukimo and more.",
            )
            .with_price(5000, "KES")
            .with_location("Thika Road, Nairobi")
            .with_rating(4.8, 200)
            .with_tags(["food", "catering", "cooking", "events"]),
    ]
});

static BOOKINGS: Lazy<Vec<Booking>> = Lazy::new(|| {
    vec![
        Booking {
            id: "b1".to_string(),
            service_id: ServiceId::new("s2"),
            service_title: "Expert Plumbing Services".to_string(),
            provider_name: "Juma Fix-It".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, 25).unwrap_or_default(),
            status: BookingStatus::Completed,
            price: 2500,
        },
        Booking {
            id: "b2".to_string(),
            service_id: ServiceId::new("s4"),
            service_title: "Laptop Repair".to_string(),
            provider_name: "David Tech".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 11, 2).unwrap_or_default(),
            status: BookingStatus::Confirmed,
            price: 1000,
        },
    ]
});

/// Returns every listing in storefront order.
#[must_use]
pub fn services() -> &'static [ServiceRecord] {
    &SERVICES
}

/// Returns an owned copy of the listings, ready to use as a candidate set.
#[must_use]
pub fn mock_services() -> Vec<ServiceRecord> {
    SERVICES.clone()
}

/// Looks up a listing by id.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when no listing has that id.
pub fn find_service(id: &str) -> Result<&'static ServiceRecord> {
    SERVICES
        .iter()
        .find(|s| s.id.as_str() == id)
        .ok_or_else(|| Error::InvalidInput(format!("unknown service '{id}'")))
}

/// Returns the signed-in user.
#[must_use]
pub fn current_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Amani Omondi".to_string(),
        is_seller: true,
        location: "Nairobi, Kenya".to_string(),
        bio: None,
        rating: 4.8,
        joined: "Jan 2023".to_string(),
    }
}

/// Returns the signed-in user's bookings.
#[must_use]
pub fn bookings() -> &'static [Booking] {
    &BOOKINGS
}
