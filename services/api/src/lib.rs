//! Payroll dashboard API
//!
//! Serves role-scoped payroll aggregates to bearer-token holders.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod state;
