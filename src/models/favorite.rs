use serde::Serialize;
use sqlx::FromRow;

use super::listing::Listing;

#[derive(Debug, Serialize, FromRow)]
pub struct FavoriteListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub listing: Listing,
    pub favorited_at: chrono::NaiveDateTime,
}
