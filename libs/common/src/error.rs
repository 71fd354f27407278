//! Custom error types for the common library
//!
//! This module defines the database error type shared by the services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while opening a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Connecting took longer than the configured timeout
    #[error("Database connection timed out after {0} seconds")]
    Timeout(u64),

    /// Error occurred during query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A column could not be converted to JSON
    #[error("Database decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
