use actix_web::{web, App, HttpServer};
use badge_backend::config::ServerConfig;
use badge_backend::services;
use badge_backend::state::AppState;
use env_logger::Env;
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    let host = config.host.clone();
    let port = config.port;
    let upload_limit = config.upload_limit;

    let state = web::Data::new(AppState::new(config));

    // Scanning font directories can take a while; do it off the request path.
    let fonts = state.engine.fonts().clone();
    tokio::task::spawn_blocking(move || fonts.warm());

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(|cfg| services::configure(cfg, upload_limit))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
