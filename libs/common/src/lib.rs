//! Common library for the payroll dashboard
//!
//! This crate provides the database plumbing shared by the services:
//! connection configuration, per-call connections, error types and
//! conversion of result rows into JSON records.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let is_healthy = health_check(&config).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod rows;
