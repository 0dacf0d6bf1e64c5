use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::error::{AppError, AppResult};
use crate::models::listing::Listing;
use crate::pricing::{nights, PricingPolicy};

/// A requested stay on a listing. Dates are half-open: `[check_in, check_out)`.
#[derive(Debug, Clone, Copy)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i64,
}

impl Stay {
    pub fn nights(&self) -> i64 {
        nights(self.check_in, self.check_out)
    }

    /// Applies the stay rules for `listing`, returning the night count.
    pub fn check(
        &self,
        listing: &Listing,
        policy: &PricingPolicy,
        today: NaiveDate,
    ) -> AppResult<i64> {
        if self.check_out <= self.check_in {
            return Err(AppError::bad_request("Check-out must be after check-in"));
        }
        if self.check_in < today {
            return Err(AppError::bad_request("Check-in cannot be in the past"));
        }

        let nights = self.nights();
        if nights < listing.min_nights {
            return Err(AppError::bad_request(format!(
                "Minimum stay is {} nights, requested {}",
                listing.min_nights, nights
            )));
        }
        if nights > policy.max_stay_nights {
            return Err(AppError::bad_request(format!(
                "Maximum stay is {} nights, requested {}",
                policy.max_stay_nights, nights
            )));
        }
        if self.guests < 1 || self.guests > listing.max_guests {
            return Err(AppError::bad_request(format!(
                "Listing accepts 1 to {} guests, requested {}",
                listing.max_guests, self.guests
            )));
        }

        Ok(nights)
    }
}

/// Counts pending or confirmed bookings on `listing_id` whose dates intersect the stay.
pub async fn conflicting_bookings(
    conn: &mut SqliteConnection,
    listing_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM bookings
        WHERE listing_id = ?
        AND status IN ('pending', 'confirmed')
        AND check_in < ?
        AND check_out > ?
        "#,
    )
    .bind(listing_id)
    .bind(check_out)
    .bind(check_in)
    .fetch_one(conn)
    .await
}
