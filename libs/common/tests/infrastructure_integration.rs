//! Integration tests for the database plumbing
//!
//! These tests need a PostgreSQL instance reachable through `DATABASE_URL`;
//! run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, connect, health_check},
    rows::row_to_json,
};
use serde_json::json;
use sqlx::Connection;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_database_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;

    assert!(health_check(&config).await?, "Database health check failed");

    let mut conn = connect(&config).await?;
    let row = sqlx::query(
        "SELECT 1::int4 AS id, 'March'::text AS date, 12.5::float8 AS pay, NULL::text AS note",
    )
    .fetch_one(&mut conn)
    .await?;

    let record = row_to_json(&row)?;
    assert_eq!(record.get("id"), Some(&json!(1)));
    assert_eq!(record.get("date"), Some(&json!("March")));
    assert_eq!(record.get("pay"), Some(&json!(12.5)));
    assert_eq!(record.get("note"), Some(&json!(null)));

    let columns: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(columns, vec!["id", "date", "pay", "note"]);

    conn.close().await?;
    Ok(())
}
