use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

pub async fn health(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
