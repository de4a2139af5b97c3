use metadata_cache::CacheError;
use query_metadata::SqlFamily;
use std::path::PathBuf;

/// The top-level error type for describe engine operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No database URL and no metadata cache to fall back to.
    #[error(
        "no database to resolve queries against. Set the `DATABASE_URL` environment variable, or provide an offline metadata cache"
    )]
    MissingDatabaseUrl,

    /// Offline resolution was forced but the cache directory does not exist.
    #[error("offline resolution requested, but the metadata cache at `{}` does not exist", .dir.display())]
    OfflineCacheMissing { dir: PathBuf },

    /// The cache holds no entry for the query.
    #[error(
        "no cached metadata for the query (hash `{hash}`). Resolve it once against a live database to record it"
    )]
    CacheMiss { hash: String },

    /// The cache entry was recorded against a different database family
    /// than the one the URL points at.
    #[error("the cached metadata was recorded against {cache}, but the database URL points at {url}")]
    FamilyMismatch { url: SqlFamily, cache: SqlFamily },

    /// Errors from the database connectors.
    #[error(transparent)]
    Connector(#[from] prequel::error::Error),

    /// Errors from the metadata cache.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
