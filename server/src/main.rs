//! Main entry point for the Formula PM auth backend.
//!
//! This file initializes the Axum web server, selects the configured user
//! store, and registers the authentication routes and middleware.

use formulapm_server::config::Config;
use formulapm_server::store::memory::{MemoryUserStore, default_roster};
use formulapm_server::store::sqlite::SqliteUserStore;
use formulapm_server::store::UserStore;
use formulapm_server::utils::jwt::JwtUtils;
use formulapm_server::{AppState, app};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            info!("using sqlite user store at {}", url);
            let store = SqliteUserStore::connect(url, &config).await.unwrap();
            if store.count_users().await.unwrap() == 0 {
                info!("empty user table, seeding default roster");
                for user in default_roster().unwrap() {
                    store.upsert_user(&user).await.unwrap();
                }
            }
            Arc::new(store)
        }
        None => {
            info!("no DATABASE_URL set, using seeded in-memory user store");
            Arc::new(MemoryUserStore::seeded().unwrap())
        }
    };

    let jwt = Arc::new(JwtUtils::new(
        &config.jwt_secret,
        config.jwt_expires_in_seconds,
    ));
    let app = app(AppState::new(store, jwt));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!(
        "Starting Formula PM auth server on port {}",
        config.server_port
    );
    axum::serve(listener, app).await.unwrap();
}
