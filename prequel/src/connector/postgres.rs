//! Definitions for the PostgreSQL connector.
//! This module is only available with the `postgresql` feature.
mod column_type;
mod error;
mod native;
mod url;

pub use native::PostgreSql;
pub use url::PostgresUrl;
