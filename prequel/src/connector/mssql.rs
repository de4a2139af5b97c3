//! Definitions for the SQL Server connector.
//! This module is only available with the `mssql` feature.
mod column_type;
mod error;
mod native;
mod url;

pub use native::Mssql;
pub use url::{EncryptMode, MssqlUrl};
