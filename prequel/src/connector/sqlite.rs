//! Definitions for the SQLite connector.
//! This module is only available with the `sqlite` feature.
mod column_type;
mod error;
mod native;
mod params;

pub use error::SqliteError;
pub use native::Sqlite;
pub use params::*;
