pub mod booking;
pub mod favorite;
pub mod listing;
pub mod review;
pub mod user;
