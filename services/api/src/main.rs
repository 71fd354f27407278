use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{
    AuthState,
    credentials::CredentialStore,
    jwt::{JwtConfig, JwtService},
};
use common::database::{DatabaseConfig, health_check};
use dashboard_api::{
    config::AppConfig, dispatcher::Dispatcher, repositories::PayrollRepository, routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting dashboard API");

    let config = AppConfig::from_env()?;

    // Data requests reconnect on every call, so an unreachable database
    // at startup is not fatal.
    let db_config = DatabaseConfig::from_env()?;
    match health_check(&db_config).await {
        Ok(_) => info!("Database connection successful"),
        Err(e) => warn!("Database is not reachable yet: {}", e),
    }

    let credentials = match &config.accounts_file {
        Some(path) => CredentialStore::from_file(path)?,
        None => CredentialStore::sample()?,
    };
    info!("Credential store holds {} accounts", credentials.account_count());

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    let dispatcher = Dispatcher::new(Arc::new(PayrollRepository::new(db_config)));

    let app_state = AppState {
        auth: AuthState::new(credentials, jwt_service),
        dispatcher,
    };

    // Start the web server
    let app = routes::create_router(app_state, config.cors_layer()?);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Dashboard API listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
