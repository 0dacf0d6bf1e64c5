use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    /// Guest service fee in basis points of the nightly subtotal.
    pub service_fee_bps: u32,
    pub max_stay_nights: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            service_fee_bps: 1200,
            max_stay_nights: 365,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub nights: i64,
    pub nightly_rate_cents: i64,
    pub subtotal_cents: i64,
    pub cleaning_fee_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
}

pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

impl PricingPolicy {
    pub fn quote(
        &self,
        nightly_rate_cents: i64,
        cleaning_fee_cents: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<PriceBreakdown> {
        let nights = nights(check_in, check_out);

        let subtotal_cents = nightly_rate_cents
            .checked_mul(nights)
            .ok_or(AppError::PriceOverflow)?;
        let service_fee_cents = subtotal_cents
            .checked_mul(i64::from(self.service_fee_bps))
            .and_then(|v| v.checked_add(5_000))
            .map(|v| v / 10_000)
            .ok_or(AppError::PriceOverflow)?;
        let total_cents = subtotal_cents
            .checked_add(cleaning_fee_cents)
            .and_then(|v| v.checked_add(service_fee_cents))
            .ok_or(AppError::PriceOverflow)?;

        Ok(PriceBreakdown {
            nights,
            nightly_rate_cents,
            subtotal_cents,
            cleaning_fee_cents,
            service_fee_cents,
            total_cents,
        })
    }
}
