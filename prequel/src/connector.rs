//! A set of abstractions for database connections.
//!
//! Provides the [`Describer`] trait for preparing and inspecting queries
//! without executing them, and the connectors for MySQL, PostgreSQL, SQLite
//! and SQL Server that implement it.

mod connection_info;
mod describer;
#[cfg(any(feature = "postgresql", feature = "mysql", feature = "mssql"))]
mod timeout;

pub use connection_info::*;
pub use describer::*;

#[cfg(feature = "postgresql")]
pub(crate) mod postgres;
#[cfg(feature = "postgresql")]
pub use postgres::*;

#[cfg(feature = "mysql")]
pub(crate) mod mysql;
#[cfg(feature = "mysql")]
pub use mysql::*;

#[cfg(feature = "sqlite")]
pub(crate) mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::*;

#[cfg(feature = "mssql")]
pub(crate) mod mssql;
#[cfg(feature = "mssql")]
pub use mssql::*;
