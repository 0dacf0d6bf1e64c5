use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::{unique_violation, AppError, AppResult};
use crate::models::user::{CreateUser, User};
use crate::state::AppState;

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUser>,
) -> AppResult<HttpResponse> {
    let mut body = body.into_inner();
    body.name = body.name.trim().to_string();
    body.email = body.email.trim().to_lowercase();
    body.validate()?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, role) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(body.role)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| unique_violation(e, "Email already registered"))?;

    log::info!("User {} registered as {:?}", user.id, user.role);
    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(path.into_inner())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(user))
}
