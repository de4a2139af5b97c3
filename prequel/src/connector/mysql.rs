//! Definitions for the MySQL connector.
//! This module is only available with the `mysql` feature.
mod column_type;
mod error;
mod native;
mod url;

pub use error::MysqlError;
pub use native::Mysql;
pub use url::MysqlUrl;
