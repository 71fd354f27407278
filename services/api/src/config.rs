//! Service configuration read from the environment

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use std::{env, path::PathBuf};
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ORIGINS: &str = "http://127.0.0.1:5500,http://localhost:8501";

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Origins allowed to make cross-origin requests
    pub cors_allowed_origins: Vec<String>,
    /// Optional account roster; the sample accounts are used without it
    pub accounts_file: Option<PathBuf>,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: listen address (default: "0.0.0.0:8000")
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins
    /// - `ACCOUNTS_FILE`: path to a JSON account roster
    pub fn from_env() -> Result<Self> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let origins = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        let cors_allowed_origins = parse_origins(&origins);

        let accounts_file = env::var("ACCOUNTS_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_address,
            cors_allowed_origins,
            accounts_file,
        })
    }

    /// Build the CORS layer for the configured origins
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin {:?}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}
