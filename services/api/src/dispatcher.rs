//! Role-scoped query dispatch
//!
//! Each role maps to a fixed list of SQL templates plus a scoping policy.
//! Self-scoped templates take the caller's numeric id as the bound
//! parameter `$1`; it is never spliced into the SQL text.

use async_trait::async_trait;
use auth::models::{AuthUser, Role};
use common::{error::DatabaseError, rows::JsonRow};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// One tabular result set, rows in the order the database returned them
pub type QueryResult = Vec<JsonRow>;

/// Body of `/data/common`
pub const COMMON_PLACEHOLDER: &str = "This is common data available to all authenticated users";

/// Which records a role's templates may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only rows belonging to the caller
    OwnRecords,
    /// Every row
    AllRecords,
}

#[derive(Debug)]
pub struct QueryTemplate {
    pub name: &'static str,
    pub sql: &'static str,
}

#[derive(Debug)]
pub struct RoleQueries {
    pub role: &'static str,
    pub scope: Scope,
    pub templates: &'static [QueryTemplate],
}

pub const EMPLOYEE_DAILY_PAY: QueryTemplate = QueryTemplate {
    name: "employee_daily_pay",
    sql: r#"
        SELECT d."date" AS "date",
               SUM(f.work_payment)::float8 AS "Hourly_Pay",
               SUM(f.travel_allowance_amount)::float8 AS "Travel_Pay",
               SUM(f.weather_allowance_amount)::float8 AS "Weather_Pay",
               SUM(f.total_pay_this_job)::float8 AS "Total_Pay"
        FROM total_pay_fact f
        JOIN date_dim d ON f.date_id = d.date_id
        WHERE f.staff_id = $1
        GROUP BY d."date"
        ORDER BY MIN(d.date_id)
    "#,
};

pub const EMPLOYEE_DAILY_HOURS: QueryTemplate = QueryTemplate {
    name: "employee_daily_hours",
    sql: r#"
        SELECT d."date" AS "date",
               SUM(f.work_hours)::float8 AS "Total_Hours"
        FROM total_pay_fact f
        JOIN date_dim d ON f.date_id = d.date_id
        WHERE f.staff_id = $1
        GROUP BY d."date"
        ORDER BY MIN(d.date_id)
    "#,
};

pub const STAFF_PAY_BREAKDOWN: QueryTemplate = QueryTemplate {
    name: "staff_pay_breakdown",
    sql: r#"
        SELECT s.name AS "Name",
               SUM(f.work_payment)::float8 AS "Hourly_Pay",
               SUM(f.travel_allowance_amount)::float8 AS "Travel_Pay",
               SUM(f.weather_allowance_amount)::float8 AS "Weather_Pay"
        FROM total_pay_fact f
        JOIN staff_dim s ON f.staff_id = s.staff_id
        GROUP BY s.name
        ORDER BY s.name
    "#,
};

pub const STAFF_TOTAL_PAY: QueryTemplate = QueryTemplate {
    name: "staff_total_pay",
    sql: r#"
        SELECT s.name AS "Name",
               SUM(f.total_pay_this_job)::float8 AS "Total_Pay"
        FROM total_pay_fact f
        JOIN staff_dim s ON f.staff_id = s.staff_id
        GROUP BY s.name
        ORDER BY s.name
    "#,
};

/// Role to query mapping
pub const ROLE_QUERIES: &[RoleQueries] = &[
    RoleQueries {
        role: Role::EMPLOYEE,
        scope: Scope::OwnRecords,
        templates: &[EMPLOYEE_DAILY_PAY, EMPLOYEE_DAILY_HOURS],
    },
    RoleQueries {
        role: Role::MANAGER,
        scope: Scope::AllRecords,
        templates: &[STAFF_PAY_BREAKDOWN, STAFF_TOTAL_PAY],
    },
];

/// A template ready to run, with its bound parameter if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub staff_id: Option<i32>,
}

/// Runs bound queries against the data store
///
/// Implementations run every query of one call over the same connection
/// and return one result set per query, in order.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, queries: &[BoundQuery]) -> Result<Vec<QueryResult>, DatabaseError>;
}

/// The data a caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataView {
    /// Available to any authenticated caller; no query runs
    Common,
    /// The result sets mapped to a role
    Role(Role),
}

/// Response body of the data routes
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DataPayload {
    Placeholder { data: &'static str },
    Tables(Vec<QueryResult>),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no queries are defined for role {0}")]
    UnknownRole(Role),

    #[error(transparent)]
    Upstream(#[from] DatabaseError),
}

/// Maps an authenticated caller to the queries of a role
#[derive(Clone)]
pub struct Dispatcher {
    executor: Arc<dyn QueryExecutor>,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Fetch the data for `view` on behalf of `user`
    pub async fn run_for_role(
        &self,
        view: &DataView,
        user: &AuthUser,
    ) -> Result<DataPayload, DispatchError> {
        let role = match view {
            DataView::Common => {
                return Ok(DataPayload::Placeholder {
                    data: COMMON_PLACEHOLDER,
                });
            }
            DataView::Role(role) => role,
        };

        let queries = bind_queries(role, user)?;
        debug!(
            "Running {} queries for role {} as {}",
            queries.len(),
            role,
            user.username
        );

        let tables = self.executor.execute(&queries).await?;
        Ok(DataPayload::Tables(tables))
    }
}

/// Resolve the templates for `role` and bind the scoping parameter
pub fn bind_queries(role: &Role, user: &AuthUser) -> Result<Vec<BoundQuery>, DispatchError> {
    let entry = ROLE_QUERIES
        .iter()
        .find(|entry| entry.role == role.as_str())
        .ok_or_else(|| DispatchError::UnknownRole(role.clone()))?;

    let staff_id = match entry.scope {
        Scope::OwnRecords => Some(user.id),
        Scope::AllRecords => None,
    };

    Ok(entry
        .templates
        .iter()
        .map(|template| BoundQuery {
            name: template.name,
            sql: template.sql,
            staff_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<Vec<BoundQuery>>>,
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        async fn execute(&self, queries: &[BoundQuery]) -> Result<Vec<QueryResult>, DatabaseError> {
            self.calls.lock().unwrap().push(queries.to_vec());
            Ok(queries
                .iter()
                .map(|q| {
                    let mut row = JsonRow::new();
                    row.insert("query".to_string(), json!(q.name));
                    row.insert("staff_id".to_string(), json!(q.staff_id));
                    vec![row]
                })
                .collect())
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl QueryExecutor for FailingExecutor {
        async fn execute(&self, _: &[BoundQuery]) -> Result<Vec<QueryResult>, DatabaseError> {
            Err(DatabaseError::Timeout(1))
        }
    }

    fn user(id: i32, roles: &[&str]) -> AuthUser {
        AuthUser {
            username: format!("user{}", id),
            name: format!("User {}", id),
            id,
            roles: roles.iter().copied().map(Role::from).collect(),
        }
    }

    #[test]
    fn test_employee_queries_bind_caller_id() {
        let queries = bind_queries(&Role::employee(), &user(42, &["employee"])).unwrap();

        assert_eq!(queries.len(), 2);
        for query in &queries {
            assert_eq!(query.staff_id, Some(42));
            assert!(query.sql.contains("f.staff_id = $1"));
            assert!(!query.sql.contains("42"));
        }
        assert_eq!(queries[0].name, "employee_daily_pay");
        assert_eq!(queries[1].name, "employee_daily_hours");
    }

    #[test]
    fn test_manager_queries_are_unscoped() {
        let queries = bind_queries(&Role::manager(), &user(0, &["manager"])).unwrap();

        assert_eq!(queries.len(), 2);
        for query in &queries {
            assert_eq!(query.staff_id, None);
            assert!(!query.sql.contains("$1"));
            assert!(query.sql.contains("GROUP BY s.name"));
        }
    }

    #[test]
    fn test_unknown_role() {
        assert!(matches!(
            bind_queries(&Role::new("auditor"), &user(1, &["auditor"])),
            Err(DispatchError::UnknownRole(_))
        ));
    }

    #[tokio::test]
    async fn test_common_view_runs_no_query() {
        let executor = Arc::new(RecordingExecutor::default());
        let dispatcher = Dispatcher::new(executor.clone());

        let payload = dispatcher
            .run_for_role(&DataView::Common, &user(1, &["employee"]))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "data": COMMON_PLACEHOLDER })
        );
        assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_view_returns_tables_in_template_order() {
        let executor = Arc::new(RecordingExecutor::default());
        let dispatcher = Dispatcher::new(executor.clone());

        let payload = dispatcher
            .run_for_role(&DataView::Role(Role::employee()), &user(3, &["employee"]))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!([
                [{ "query": "employee_daily_pay", "staff_id": 3 }],
                [{ "query": "employee_daily_hours", "staff_id": 3 }]
            ])
        );

        // Both queries go to the executor in a single call.
        assert_eq!(executor.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_executor_failure_is_upstream_error() {
        let dispatcher = Dispatcher::new(Arc::new(FailingExecutor));

        let err = dispatcher
            .run_for_role(&DataView::Role(Role::manager()), &user(0, &["manager"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Upstream(_)));
    }
}
