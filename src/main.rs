use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use trip_builder_api::{config::AppConfig, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let (host, port) = (config.host.clone(), config.port);
    info!("Using backend at {}", config.backend_url);

    let state = web::Data::new(AppState::new(config).map_err(std::io::Error::other)?);

    info!("Attempting to bind to {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(|| async { "Trip builder API is running" }))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
