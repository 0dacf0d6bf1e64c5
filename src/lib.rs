//! StayFinder: a vacation-rental marketplace backend.
//!
//! Hosts publish listings, guests book half-open date ranges `[check_in, check_out)`,
//! hosts confirm and complete stays, and guests review completed stays.
//! The booking path checks availability and prices the stay inside one
//! SQLite transaction.

use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

pub mod availability;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod pricing;
pub mod state;

use handlers::{bookings, favorites, health, listings, reviews, users};

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

/// Mounts every route. Shared by the binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        let message = err.to_string();
        InternalError::from_response(err, bad_request(message)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        let message = err.to_string();
        InternalError::from_response(err, bad_request(message)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        let message = err.to_string();
        InternalError::from_response(err, bad_request(message)).into()
    }))
    .route("/health", web::get().to(health::health))
    .service(
        web::scope("/users")
            .route("", web::post().to(users::create_user))
            .route("/{id}", web::get().to(users::get_user)),
    )
    .service(
        web::scope("/listings")
            .route("", web::get().to(listings::list_listings))
            .route("", web::post().to(listings::create_listing))
            .route("/{id}", web::get().to(listings::get_listing))
            .route("/{id}", web::patch().to(listings::update_listing))
            .route("/{id}", web::delete().to(listings::delete_listing))
            .route(
                "/{id}/availability",
                web::get().to(listings::check_availability),
            )
            .route("/{id}/bookings", web::get().to(listings::listing_bookings))
            .route("/{id}/reviews", web::get().to(reviews::listing_reviews)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::my_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}/confirm", web::post().to(bookings::confirm_booking))
            .route("/{id}/cancel", web::post().to(bookings::cancel_booking))
            .route("/{id}/complete", web::post().to(bookings::complete_booking))
            .route("/{id}/review", web::post().to(reviews::create_review)),
    )
    .service(
        web::scope("/favorites")
            .route("", web::get().to(favorites::list_favorites))
            .route("/{listing_id}", web::put().to(favorites::add_favorite))
            .route("/{listing_id}", web::delete().to(favorites::remove_favorite)),
    );
}
