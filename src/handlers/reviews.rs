use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::{unique_violation, AppError, AppResult};
use crate::handlers::bookings::fetch_booking;
use crate::handlers::listings::fetch_listing;
use crate::identity::CurrentUser;
use crate::models::booking::BookingStatus;
use crate::models::review::{CreateReview, Review};
use crate::state::AppState;

pub async fn create_review(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<CreateReview>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let booking = fetch_booking(&state.pool, path.into_inner()).await?;
    if booking.guest_id != user.id() {
        return Err(AppError::forbidden("Only the guest can review this stay"));
    }
    if booking.status != BookingStatus::Completed {
        return Err(AppError::conflict("Only completed stays can be reviewed"));
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (booking_id, listing_id, guest_id, rating, comment)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(booking.id)
    .bind(booking.listing_id)
    .bind(user.id())
    .bind(body.rating)
    .bind(body.comment.trim())
    .fetch_one(&state.pool)
    .await
    .map_err(|e| unique_violation(e, "This stay has already been reviewed"))?;

    Ok(HttpResponse::Created().json(review))
}

pub async fn listing_reviews(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let listing = fetch_listing(&state.pool, path.into_inner()).await?;

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE listing_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(listing.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(HttpResponse::Ok().json(reviews))
}
