//! Service listing types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a service listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a new service ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Marketplace categories a listing can belong to.
///
/// Serialized with the display label so the compact search index reads the
/// same way the storefront does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    /// Lessons and exam preparation.
    #[serde(rename = "Tutoring")]
    Tutoring,
    /// Plumbing, electrical and general fixes.
    #[serde(rename = "Home Repair")]
    HomeRepair,
    /// Computer and phone support.
    #[serde(rename = "Tech Support")]
    Tech,
    /// Hair, nails and wellness.
    #[serde(rename = "Beauty & Wellness")]
    Beauty,
    /// Design, photography and content.
    #[serde(rename = "Creative & Design")]
    Creative,
    /// Deliveries and rides.
    #[serde(rename = "Transport")]
    Transport,
    /// Anything else.
    #[serde(rename = "Other")]
    Other,
}

impl ServiceCategory {
    /// Returns all categories in storefront order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Tutoring,
            Self::HomeRepair,
            Self::Tech,
            Self::Beauty,
            Self::Creative,
            Self::Transport,
            Self::Other,
        ]
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tutoring => "Tutoring",
            Self::HomeRepair => "Home Repair",
            Self::Tech => "Tech Support",
            Self::Beauty => "Beauty & Wellness",
            Self::Creative => "Creative & Design",
            Self::Transport => "Transport",
            Self::Other => "Other",
        }
    }

    /// Parses a category from its label or a short alias.
    ///
    /// Case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tutoring" => Some(Self::Tutoring),
            "home repair" | "home-repair" | "repair" => Some(Self::HomeRepair),
            "tech support" | "tech" => Some(Self::Tech),
            "beauty & wellness" | "beauty" => Some(Self::Beauty),
            "creative & design" | "creative" | "design" => Some(Self::Creative),
            "transport" => Some(Self::Transport),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A service listing.
///
/// Owned by the catalog; search only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Unique identifier.
    pub id: ServiceId,
    /// Provider user id.
    pub provider_id: String,
    /// Provider display name.
    pub provider_name: String,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category.
    pub category: ServiceCategory,
    /// Price in whole currency units.
    pub price: u64,
    /// ISO currency code.
    pub currency: String,
    /// Location label.
    pub location: String,
    /// Average rating out of 5.
    pub rating: f32,
    /// Number of reviews behind the rating.
    pub review_count: u32,
    /// Ordered tags.
    pub tags: Vec<String>,
}

impl ServiceRecord {
    /// Creates a listing with the searchable fields set and the rest empty.
    #[must_use]
    pub fn new(
        id: impl Into<ServiceId>,
        title: impl Into<String>,
        category: ServiceCategory,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: String::new(),
            provider_name: String::new(),
            title: title.into(),
            description: String::new(),
            category,
            price: 0,
            currency: "KES".to_string(),
            location: String::new(),
            rating: 0.0,
            review_count: 0,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the provider.
    #[must_use]
    pub fn with_provider(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.provider_id = id.into();
        self.provider_name = name.into();
        self
    }

    /// Sets the price and currency.
    #[must_use]
    pub fn with_price(mut self, price: u64, currency: impl Into<String>) -> Self {
        self.price = price;
        self.currency = currency.into();
        self
    }

    /// Sets the rating and review count.
    #[must_use]
    pub const fn with_rating(mut self, rating: f32, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    /// Projects the listing down to the fields sent to a semantic matcher.
    #[must_use]
    pub fn compact(&self) -> CompactServiceEntry<'_> {
        CompactServiceEntry {
            id: &self.id,
            title: &self.title,
            description: &self.description,
            category: self.category,
            location: &self.location,
            tags: &self.tags,
        }
    }
}

/// The compact index entry for a listing.
///
/// Prices, ratings and provider details are stripped to keep the payload small.
#[derive(Debug, Clone, Serialize)]
pub struct CompactServiceEntry<'a> {
    /// Listing id.
    pub id: &'a ServiceId,
    /// Display title.
    pub title: &'a str,
    /// Free-text description.
    pub description: &'a str,
    /// Category label.
    pub category: ServiceCategory,
    /// Location label.
    pub location: &'a str,
    /// Tags.
    pub tags: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_roundtrips_label() {
        for category in ServiceCategory::all() {
            assert_eq!(ServiceCategory::parse(category.label()), Some(*category));
        }
        assert_eq!(ServiceCategory::parse("TECH"), Some(ServiceCategory::Tech));
        assert_eq!(ServiceCategory::parse("gardening"), None);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&ServiceCategory::HomeRepair).unwrap();
        assert_eq!(json, "\"Home Repair\"");
    }

    #[test]
    fn test_compact_projection_omits_price_and_rating() {
        let record = ServiceRecord::new("s9", "Bike Courier", ServiceCategory::Transport)
            .with_description("Same-day parcels")
            .with_location("Nairobi CBD")
            .with_tags(["delivery"])
            .with_price(800, "KES")
            .with_rating(4.5, 12);

        let value = serde_json::to_value(record.compact()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 6);
        assert_eq!(object["id"], "s9");
        assert_eq!(object["category"], "Transport");
        assert!(!object.contains_key("price"));
        assert!(!object.contains_key("rating"));
    }
}
