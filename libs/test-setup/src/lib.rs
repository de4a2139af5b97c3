//! This crate contains utilities that are useful for writing tests across
//! the workspace: a test logger, and the environment variables naming live
//! databases to test against.
//!
//! Live database tests read their connection strings from the environment
//! and skip silently when the variable is unset, so the default test run
//! needs no running servers.

mod logging;

pub use logging::init_test_logger;

/// The PostgreSQL connection string for live tests, from
/// `TEST_POSTGRES_URL`.
pub fn postgres_test_url() -> Option<String> {
    test_url("TEST_POSTGRES_URL")
}

/// The MySQL connection string for live tests, from `TEST_MYSQL_URL`.
pub fn mysql_test_url() -> Option<String> {
    test_url("TEST_MYSQL_URL")
}

/// The SQL Server JDBC connection string for live tests, from
/// `TEST_MSSQL_URL`.
pub fn mssql_test_url() -> Option<String> {
    test_url("TEST_MSSQL_URL")
}

fn test_url(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|url| !url.is_empty())
}
