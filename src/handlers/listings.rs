use actix_web::{web, HttpResponse};
use sqlx::types::Json;
use validator::Validate;

use crate::availability::{conflicting_bookings, Stay};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::handlers::Pagination;
use crate::identity::CurrentUser;
use crate::models::booking::Booking;
use crate::models::listing::{
    AvailabilityQuery, AvailabilityQuote, CreateListing, Listing, ListingDetail, UpdateListing,
};
use crate::state::AppState;

pub(crate) async fn fetch_listing<'e, E>(executor: E, id: i64) -> AppResult<Listing>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Listing"))
}

fn ensure_owner(user: &CurrentUser, listing: &Listing) -> AppResult<()> {
    if listing.host_id != user.id() {
        return Err(AppError::forbidden("Only the listing's host may do this"));
    }
    Ok(())
}

pub async fn create_listing(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateListing>,
) -> AppResult<HttpResponse> {
    if !user.0.is_host() {
        return Err(AppError::forbidden("Only hosts can create listings"));
    }

    body.validate()?;

    let body = body.into_inner();
    let listing = sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings (host_id, title, description, city, country, nightly_rate_cents,
                              cleaning_fee_cents, max_guests, bedrooms, min_nights, amenities)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user.id())
    .bind(body.title)
    .bind(body.description)
    .bind(body.city)
    .bind(body.country)
    .bind(body.nightly_rate_cents)
    .bind(body.cleaning_fee_cents)
    .bind(body.max_guests)
    .bind(body.bedrooms)
    .bind(body.min_nights)
    .bind(Json(body.amenities))
    .fetch_one(&state.pool)
    .await?;

    log::info!("Listing {} created by host {}", listing.id, user.id());
    Ok(HttpResponse::Created().json(listing))
}

pub async fn list_listings(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let listings = sqlx::query_as::<_, Listing>(
        "SELECT * FROM listings ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&state.pool)
    .await?;

    Ok(HttpResponse::Ok().json(listings))
}

pub async fn get_listing(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let listing = fetch_listing(&state.pool, path.into_inner()).await?;

    let (average_rating, review_count): (Option<f64>, i64) =
        sqlx::query_as("SELECT AVG(rating), COUNT(*) FROM reviews WHERE listing_id = ?")
            .bind(listing.id)
            .fetch_one(&state.pool)
            .await?;

    Ok(HttpResponse::Ok().json(ListingDetail {
        listing,
        average_rating,
        review_count,
    }))
}

pub async fn update_listing(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<UpdateListing>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let mut tx = db::begin_write(&state.pool).await?;

    let mut listing = fetch_listing(&mut *tx, path.into_inner()).await?;
    ensure_owner(&user, &listing)?;
    body.into_inner().apply(&mut listing);

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        UPDATE listings
        SET title = ?, description = ?, city = ?, country = ?, nightly_rate_cents = ?,
            cleaning_fee_cents = ?, max_guests = ?, bedrooms = ?, min_nights = ?, amenities = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(&listing.city)
    .bind(&listing.country)
    .bind(listing.nightly_rate_cents)
    .bind(listing.cleaning_fee_cents)
    .bind(listing.max_guests)
    .bind(listing.bedrooms)
    .bind(listing.min_nights)
    .bind(&listing.amenities)
    .bind(listing.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(listing))
}

pub async fn delete_listing(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let mut tx = db::begin_write(&state.pool).await?;

    let listing = fetch_listing(&mut *tx, path.into_inner()).await?;
    ensure_owner(&user, &listing)?;

    // Stays that have not ended yet keep the listing alive.
    let upcoming: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM bookings
        WHERE listing_id = ?
        AND status IN ('pending', 'confirmed')
        AND check_out > ?
        "#,
    )
    .bind(listing.id)
    .bind(state.today())
    .fetch_one(&mut *tx)
    .await?;

    if upcoming > 0 {
        return Err(AppError::conflict(format!("Listing has {upcoming} upcoming bookings")));
    }

    sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(listing.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("Listing {} deleted by host {}", listing.id, user.id());
    Ok(HttpResponse::NoContent().finish())
}

pub async fn check_availability(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<AvailabilityQuery>,
) -> AppResult<HttpResponse> {
    let mut conn = state.pool.acquire().await?;

    let listing = fetch_listing(&mut *conn, path.into_inner()).await?;
    let stay = Stay {
        check_in: query.check_in,
        check_out: query.check_out,
        guests: query.guests,
    };
    let nights = stay.check(&listing, &state.pricing, state.today())?;

    let conflicts =
        conflicting_bookings(&mut *conn, listing.id, stay.check_in, stay.check_out).await?;
    let breakdown = state.pricing.quote(
        listing.nightly_rate_cents,
        listing.cleaning_fee_cents,
        stay.check_in,
        stay.check_out,
    )?;

    Ok(HttpResponse::Ok().json(AvailabilityQuote {
        available: conflicts == 0,
        nights,
        breakdown,
    }))
}

pub async fn listing_bookings(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let listing = fetch_listing(&state.pool, path.into_inner()).await?;
    ensure_owner(&user, &listing)?;

    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE listing_id = ? ORDER BY check_in, id",
    )
    .bind(listing.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(HttpResponse::Ok().json(bookings))
}
