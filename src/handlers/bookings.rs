use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::availability::{conflicting_bookings, Stay};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::handlers::listings::fetch_listing;
use crate::identity::CurrentUser;
use crate::models::booking::{Booking, BookingAction, BookingStatus, CreateBooking};
use crate::state::AppState;

pub(crate) async fn fetch_booking<'e, E>(executor: E, id: i64) -> AppResult<Booking>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Booking"))
}

pub async fn create_booking(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateBooking>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    // Dropping `tx` on any early return rolls it back.
    let mut tx = db::begin_write(&state.pool).await?;

    let listing = fetch_listing(&mut *tx, body.listing_id).await?;
    if listing.host_id == user.id() {
        return Err(AppError::bad_request("Hosts cannot book their own listing"));
    }

    let stay = Stay {
        check_in: body.check_in,
        check_out: body.check_out,
        guests: body.guests,
    };
    stay.check(&listing, &state.pricing, state.today())?;

    let conflicts =
        conflicting_bookings(&mut *tx, listing.id, stay.check_in, stay.check_out).await?;
    if conflicts > 0 {
        return Err(AppError::conflict(format!(
            "Listing is not available from {} to {}",
            stay.check_in, stay.check_out
        )));
    }

    let price = state.pricing.quote(
        listing.nightly_rate_cents,
        listing.cleaning_fee_cents,
        stay.check_in,
        stay.check_out,
    )?;

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (listing_id, guest_id, check_in, check_out, guests, nights,
                              subtotal_cents, cleaning_fee_cents, service_fee_cents,
                              total_cents, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(listing.id)
    .bind(user.id())
    .bind(stay.check_in)
    .bind(stay.check_out)
    .bind(stay.guests)
    .bind(price.nights)
    .bind(price.subtotal_cents)
    .bind(price.cleaning_fee_cents)
    .bind(price.service_fee_cents)
    .bind(price.total_cents)
    .bind(BookingStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!(
        "Booking {} created on listing {} for {} nights, total {} cents",
        booking.id,
        listing.id,
        booking.nights,
        booking.total_cents
    );
    Ok(HttpResponse::Created().json(booking))
}

pub async fn my_bookings(state: web::Data<AppState>, user: CurrentUser) -> AppResult<HttpResponse> {
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE guest_id = ? ORDER BY check_in DESC, id DESC",
    )
    .bind(user.id())
    .fetch_all(&state.pool)
    .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn get_booking(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = fetch_booking(&state.pool, path.into_inner()).await?;
    let listing = fetch_listing(&state.pool, booking.listing_id).await?;

    if booking.guest_id != user.id() && listing.host_id != user.id() {
        return Err(AppError::forbidden("Not your booking"));
    }

    Ok(HttpResponse::Ok().json(booking))
}

pub async fn confirm_booking(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = transition(&state, &user, path.into_inner(), BookingAction::Confirm).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = transition(&state, &user, path.into_inner(), BookingAction::Cancel).await?;
    let refund_cents = booking.total_cents;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking cancelled successfully",
        "booking": booking,
        "refund_cents": refund_cents,
    })))
}

pub async fn complete_booking(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = transition(&state, &user, path.into_inner(), BookingAction::Complete).await?;
    Ok(HttpResponse::Ok().json(booking))
}

async fn transition(
    state: &AppState,
    user: &CurrentUser,
    booking_id: i64,
    action: BookingAction,
) -> AppResult<Booking> {
    let mut tx = db::begin_write(&state.pool).await?;

    let booking = fetch_booking(&mut *tx, booking_id).await?;
    let listing = fetch_listing(&mut *tx, booking.listing_id).await?;

    let is_host = listing.host_id == user.id();
    let allowed = match action {
        BookingAction::Confirm | BookingAction::Complete => is_host,
        BookingAction::Cancel => is_host || booking.guest_id == user.id(),
    };
    if !allowed {
        return Err(AppError::forbidden(format!("Not allowed to {action} this booking")));
    }

    let next = booking.status.apply(action).ok_or_else(|| {
        AppError::conflict(format!("Cannot {action} a {} booking", booking.status))
    })?;

    let today = state.today();
    match action {
        BookingAction::Cancel if booking.check_in <= today => {
            return Err(AppError::bad_request("Cannot cancel booking after or on check-in date"));
        }
        BookingAction::Complete if today < booking.check_out => {
            return Err(AppError::bad_request("Cannot complete booking before check-out date"));
        }
        _ => {}
    }

    let booking = sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET status = ? WHERE id = ? RETURNING *",
    )
    .bind(next)
    .bind(booking.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!("Booking {} is now {} (by user {})", booking.id, next, user.id());
    Ok(booking)
}
