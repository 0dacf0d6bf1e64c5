use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Cancel,
    Complete,
}

impl BookingStatus {
    /// Next status after `action`, or `None` when the move is not allowed.
    pub fn apply(self, action: BookingAction) -> Option<BookingStatus> {
        use BookingAction::*;
        use BookingStatus::*;

        match (self, action) {
            (Pending, Confirm) => Some(Confirmed),
            (Pending | Confirmed, Cancel) => Some(Cancelled),
            (Confirmed, Complete) => Some(Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Cancel => "cancel",
            BookingAction::Complete => "complete",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub listing_id: i64,
    pub guest_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub guests: i64,
    pub nights: i64,
    pub subtotal_cents: i64,
    pub cleaning_fee_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
    pub status: BookingStatus,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBooking {
    pub listing_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    #[validate(range(min = 1))]
    pub guests: i64,
}

#[cfg(test)]
mod tests {
    use super::BookingAction::*;
    use super::BookingStatus::*;

    #[test]
    fn pending_can_be_confirmed_or_cancelled() {
        assert_eq!(Pending.apply(Confirm), Some(Confirmed));
        assert_eq!(Pending.apply(Cancel), Some(Cancelled));
        assert_eq!(Pending.apply(Complete), None);
    }

    #[test]
    fn confirmed_can_be_cancelled_or_completed() {
        assert_eq!(Confirmed.apply(Confirm), None);
        assert_eq!(Confirmed.apply(Cancel), Some(Cancelled));
        assert_eq!(Confirmed.apply(Complete), Some(Completed));
    }

    #[test]
    fn terminal_statuses_do_not_move() {
        for status in [Cancelled, Completed] {
            for action in [Confirm, Cancel, Complete] {
                assert_eq!(status.apply(action), None, "{status} -> {action}");
            }
        }
    }
}
