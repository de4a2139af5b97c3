//! The top-level library crate for the describe engine.
//!
//! The engine resolves SQL query text to metadata at build time: the bind
//! parameters the query takes and the columns it returns. Resolution runs
//! against a live database when one is configured, and against an offline
//! metadata cache otherwise, so a checked-in cache is enough to build
//! without database access.

mod config;
mod error;
mod resolver;
mod typing;

pub use config::ResolverOpts;
pub use error::ResolveError;
pub use resolver::{QueryResolver, ResolvedQuery};
pub use typing::{rust_type, rust_type_for_parameter};

/// The result type for describe engine operations.
pub type CoreResult<T> = Result<T, ResolveError>;
