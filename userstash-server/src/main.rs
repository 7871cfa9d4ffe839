use actix_web::{web, App, HttpServer};
use std::sync::Mutex;
use userstash::{seed, UserStore};

mod handlers;

/// Shared application state.
/// The store sits behind a mutex so each request's read-modify-write
/// cycle runs to completion before the next one starts.
pub struct AppState {
    pub store: Mutex<UserStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Starting userstash server");

    let data_file =
        std::env::var("USERSTASH_DATA_FILE").unwrap_or_else(|_| "data/users.json".to_string());
    let seed_url = std::env::var("USERSTASH_SEED_URL")
        .unwrap_or_else(|_| seed::DEFAULT_SEED_URL.to_string());
    let host = std::env::var("USERSTASH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("USERSTASH_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let store = UserStore::new(&data_file);

    // The seed completes (or fails) before the listener binds, so no
    // request can observe a half-initialized document.
    log::info!("Seeding document at {data_file} from {seed_url}");
    if let Err(e) = seed::seed_or_fallback(&seed_url, &store).await {
        log::error!("Seed initialization failed: {e}");
    }

    let state = web::Data::new(AppState {
        store: Mutex::new(store),
    });

    log::info!("Listening on {host}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
