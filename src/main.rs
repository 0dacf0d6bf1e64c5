use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use stayfinder::{config::Config, db, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load().map_err(std::io::Error::other)?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(std::io::Error::other)?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    let address = (config.bind_addr.clone(), config.port);
    log::info!("Starting server at http://{}:{}", address.0, address.1);

    let state = web::Data::new(AppState::new(pool, config.pricing()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(stayfinder::configure)
    })
    .bind(address)?
    .run()
    .await
}
