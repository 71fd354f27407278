//! Payroll repository backed by PostgreSQL

use async_trait::async_trait;
use common::{
    database::{DatabaseConfig, connect},
    error::{DatabaseError, DatabaseResult},
    rows::row_to_json,
};
use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

use crate::dispatcher::{BoundQuery, QueryExecutor, QueryResult};

/// Payroll repository
///
/// Opens one connection per call and closes it afterwards.
#[derive(Clone)]
pub struct PayrollRepository {
    config: DatabaseConfig,
}

impl PayrollRepository {
    /// Create a new payroll repository
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl QueryExecutor for PayrollRepository {
    async fn execute(&self, queries: &[BoundQuery]) -> DatabaseResult<Vec<QueryResult>> {
        let mut conn = connect(&self.config).await?;
        let results = run_all(&mut conn, queries).await;

        // Closed on both outcomes; a failed query must not leak the connection.
        if let Err(e) = conn.close().await {
            warn!("Failed to close database connection: {}", e);
        }

        results
    }
}

async fn run_all(conn: &mut PgConnection, queries: &[BoundQuery]) -> DatabaseResult<Vec<QueryResult>> {
    let mut results = Vec::with_capacity(queries.len());

    for bound in queries {
        let mut query = sqlx::query(bound.sql);
        if let Some(staff_id) = bound.staff_id {
            query = query.bind(staff_id);
        }

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(DatabaseError::Query)?;
        debug!("{} returned {} rows", bound.name, rows.len());

        let table = rows
            .iter()
            .map(row_to_json)
            .collect::<DatabaseResult<QueryResult>>()?;
        results.push(table);
    }

    Ok(results)
}
