#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{Method, StatusCode},
    test,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use stayfinder::{db, pricing::PricingPolicy, state::{AppState, Clock}};

pub struct ManualClock(Mutex<NaiveDate>);

impl ManualClock {
    pub fn set(&self, date: NaiveDate) {
        *self.0.lock().unwrap() = date;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.0.lock().unwrap()
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub const TODAY: &str = "2030-03-01";

pub async fn setup() -> (AppState, Arc<ManualClock>) {
    // One connection so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    setup_with_pool(pool).await
}

pub async fn setup_with_pool(pool: SqlitePool) -> (AppState, Arc<ManualClock>) {
    db::run_migrations(&pool).await.unwrap();

    let clock = Arc::new(ManualClock(Mutex::new(date(TODAY))));
    let state = AppState::with_clock(
        pool,
        PricingPolicy {
            service_fee_bps: 1200,
            max_stay_nights: 30,
        },
        clock.clone(),
    );
    (state, clock)
}

#[macro_export]
macro_rules! app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(stayfinder::configure),
        )
        .await
    };
}

pub async fn send<S, B>(
    app: &S,
    method: Method,
    uri: &str,
    user: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(user) = user {
        req = req.insert_header(("X-User-Id", user.to_string()));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get<S, B>(app: &S, uri: &str, user: Option<i64>) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, Method::GET, uri, user, None).await
}

/// POST without a body, as used by the booking status actions.
pub async fn post<S, B>(app: &S, uri: &str, user: i64) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn create_user<S, B>(app: &S, name: &str, role: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

/// A two-guest cabin at 100.00/night with a 25.00 cleaning fee and a 2-night minimum.
pub async fn create_listing<S, B>(app: &S, host: i64) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        Method::POST,
        "/listings",
        Some(host),
        Some(json!({
            "title": "Lakeside cabin",
            "description": "Quiet cabin by the water",
            "city": "Tahoe",
            "country": "US",
            "nightly_rate_cents": 10_000,
            "cleaning_fee_cents": 2_500,
            "max_guests": 2,
            "bedrooms": 1,
            "min_nights": 2,
            "amenities": ["wifi", "fireplace"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

pub async fn book<S, B>(
    app: &S,
    guest: i64,
    listing: i64,
    check_in: &str,
    check_out: &str,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        Method::POST,
        "/bookings",
        Some(guest),
        Some(json!({
            "listing_id": listing,
            "check_in": check_in,
            "check_out": check_out,
            "guests": 2,
        })),
    )
    .await
}
