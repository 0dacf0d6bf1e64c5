use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use crate::pricing::PriceBreakdown;

/// Upper bound for a nightly rate or cleaning fee (1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: i64,
    pub host_id: i64,
    pub title: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub nightly_rate_cents: i64,
    pub cleaning_fee_cents: i64,
    pub max_guests: i64,
    pub bedrooms: i64,
    pub min_nights: i64,
    pub amenities: Json<Vec<String>>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListing {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(range(min = 1, max = MAX_PRICE_CENTS))]
    pub nightly_rate_cents: i64,
    #[validate(range(min = 0, max = MAX_PRICE_CENTS))]
    #[serde(default)]
    pub cleaning_fee_cents: i64,
    #[validate(range(min = 1))]
    pub max_guests: i64,
    #[validate(range(min = 0))]
    #[serde(default = "default_one")]
    pub bedrooms: i64,
    #[validate(range(min = 1))]
    #[serde(default = "default_one")]
    pub min_nights: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn default_one() -> i64 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListing {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    #[validate(range(min = 1, max = MAX_PRICE_CENTS))]
    pub nightly_rate_cents: Option<i64>,
    #[validate(range(min = 0, max = MAX_PRICE_CENTS))]
    pub cleaning_fee_cents: Option<i64>,
    #[validate(range(min = 1))]
    pub max_guests: Option<i64>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i64>,
    #[validate(range(min = 1))]
    pub min_nights: Option<i64>,
    pub amenities: Option<Vec<String>>,
}

impl UpdateListing {
    pub fn apply(self, listing: &mut Listing) {
        if let Some(title) = self.title {
            listing.title = title;
        }
        if let Some(description) = self.description {
            listing.description = description;
        }
        if let Some(city) = self.city {
            listing.city = city;
        }
        if let Some(country) = self.country {
            listing.country = country;
        }
        if let Some(rate) = self.nightly_rate_cents {
            listing.nightly_rate_cents = rate;
        }
        if let Some(fee) = self.cleaning_fee_cents {
            listing.cleaning_fee_cents = fee;
        }
        if let Some(max_guests) = self.max_guests {
            listing.max_guests = max_guests;
        }
        if let Some(bedrooms) = self.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(min_nights) = self.min_nights {
            listing.min_nights = min_nights;
        }
        if let Some(amenities) = self.amenities {
            listing.amenities = Json(amenities);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    #[serde(default = "default_one")]
    pub guests: i64,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityQuote {
    pub available: bool,
    pub nights: i64,
    pub breakdown: PriceBreakdown,
}
