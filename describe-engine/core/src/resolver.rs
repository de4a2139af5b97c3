//! Query resolution against a live database or the offline metadata cache.

use crate::{CoreResult, ResolveError, ResolverOpts};
use metadata_cache::{MetadataCache, query_hash};
use prequel::{
    connector::{ConnectionInfo, Describer},
    single::Prequel,
};
use query_metadata::{QueryDescription, QueryMetadata, SqlFamily};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::Instrument;

/// The metadata of one resolved query, column overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// The cache identity of the query text.
    pub hash: String,
    /// The family of the database the metadata came from.
    pub family: SqlFamily,
    /// The bind parameters and result columns of the query.
    pub description: QueryDescription,
}

/// Resolves query text to metadata, connecting or reading the cache as
/// configured.
///
/// The resolver holds one connection per distinct database URL and reuses
/// it across resolutions. A connection that reported itself broken is
/// discarded and reopened on the next use.
pub struct QueryResolver {
    opts: ResolverOpts,
    cache: MetadataCache,
    connections: Mutex<HashMap<String, Arc<Prequel>>>,
}

impl QueryResolver {
    pub fn new(opts: ResolverOpts) -> Self {
        let cache = MetadataCache::open(opts.cache_dir());

        QueryResolver {
            opts,
            cache,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// A resolver configured from the environment. See
    /// [`ResolverOpts::from_env`].
    pub fn from_env() -> Self {
        Self::new(ResolverOpts::from_env())
    }

    /// Resolves one query to its parameters and result columns.
    ///
    /// When offline mode is forced, only the cache is consulted. Otherwise
    /// a configured database URL wins, and an existing cache serves as the
    /// fallback when no URL is set.
    pub async fn resolve(&self, sql: &str) -> CoreResult<ResolvedQuery> {
        let hash = query_hash(sql);
        let span = tracing::debug_span!("resolve", query_hash = %hash, family = tracing::field::Empty);

        self.resolve_with_hash(sql, hash).instrument(span).await
    }

    async fn resolve_with_hash(&self, sql: &str, hash: String) -> CoreResult<ResolvedQuery> {
        if self.opts.offline {
            tracing::debug!("offline mode is forced, resolving from the cache");

            if !self.cache.exists() {
                return Err(ResolveError::OfflineCacheMissing {
                    dir: self.cache.root().to_owned(),
                });
            }

            let metadata = self.cached(&hash)?;

            // Offline mode still validates a configured URL against the
            // recorded family, so a stale cache cannot cross databases.
            if let Some(url) = self.opts.database_url.as_deref() {
                let url_family = ConnectionInfo::from_url(url)?.sql_family();

                if url_family != metadata.family {
                    return Err(ResolveError::FamilyMismatch {
                        url: url_family,
                        cache: metadata.family,
                    });
                }
            }

            return Ok(finish(hash, metadata.family, metadata.description));
        }

        if let Some(url) = self.opts.database_url.as_deref() {
            tracing::debug!("resolving against the live database");

            return self.resolve_live(url, sql, hash).await;
        }

        if self.cache.exists() {
            tracing::debug!("no database URL set, falling back to the metadata cache");

            let metadata = self.cached(&hash)?;

            return Ok(finish(hash, metadata.family, metadata.description));
        }

        Err(ResolveError::MissingDatabaseUrl)
    }

    async fn resolve_live(&self, url: &str, sql: &str, hash: String) -> CoreResult<ResolvedQuery> {
        let conn = self.connection(url).await?;
        let family = conn.sql_family();
        let description = conn.describe(sql).await?;

        if self.opts.record {
            // The cache keeps the raw description, overrides apply on the
            // way out.
            let metadata = QueryMetadata {
                family,
                query: sql.to_owned(),
                description: description.clone(),
            };

            let path = self.cache.store(&metadata)?;
            tracing::debug!(path = %path.display(), "recorded query metadata");
        }

        Ok(finish(hash, family, description))
    }

    fn cached(&self, hash: &str) -> CoreResult<QueryMetadata> {
        match self.cache.load(hash)? {
            Some(metadata) => {
                tracing::debug!("metadata cache hit");

                Ok(metadata)
            }
            None => Err(ResolveError::CacheMiss { hash: hash.to_owned() }),
        }
    }

    async fn connection(&self, url: &str) -> CoreResult<Arc<Prequel>> {
        let mut connections = self.connections.lock().await;

        if let Some(conn) = connections.get(url) {
            if conn.is_healthy() {
                return Ok(conn.clone());
            }

            tracing::debug!("discarding an unhealthy connection");
        }

        let conn = Arc::new(Prequel::new(url).await?);
        connections.insert(url.to_owned(), conn.clone());

        Ok(conn)
    }
}

fn finish(hash: String, family: SqlFamily, mut description: QueryDescription) -> ResolvedQuery {
    tracing::Span::current().record("family", tracing::field::display(family));
    description.apply_column_overrides();

    ResolvedQuery {
        hash,
        family,
        description,
    }
}
