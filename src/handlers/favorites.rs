use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::handlers::listings::fetch_listing;
use crate::identity::CurrentUser;
use crate::models::favorite::FavoriteListing;
use crate::state::AppState;

pub async fn add_favorite(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let listing = fetch_listing(&state.pool, path.into_inner()).await?;

    sqlx::query("INSERT OR IGNORE INTO favorites (user_id, listing_id) VALUES (?, ?)")
        .bind(user.id())
        .bind(listing.id)
        .execute(&state.pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn remove_favorite(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    sqlx::query("DELETE FROM favorites WHERE user_id = ? AND listing_id = ?")
        .bind(user.id())
        .bind(path.into_inner())
        .execute(&state.pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_favorites(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    let favorites = sqlx::query_as::<_, FavoriteListing>(
        r#"
        SELECT l.*, f.created_at AS favorited_at
        FROM favorites f
        JOIN listings l ON l.id = f.listing_id
        WHERE f.user_id = ?
        ORDER BY f.created_at DESC, f.rowid DESC
        "#,
    )
    .bind(user.id())
    .fetch_all(&state.pool)
    .await?;

    Ok(HttpResponse::Ok().json(favorites))
}
