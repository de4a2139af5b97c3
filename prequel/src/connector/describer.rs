use async_trait::async_trait;
use query_metadata::{QueryDescription, SqlFamily};

/// Prepares and inspects queries against a live database.
///
/// Implemented by all database connectors and the [`Prequel`] dispatcher.
///
/// [`Prequel`]: ../single/struct.Prequel.html
#[async_trait]
pub trait Describer: Send + Sync {
    /// Prepares the query server-side and reports its bind parameters and
    /// result columns. The query itself is never executed and no database
    /// state changes.
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription>;

    /// Executes a command returning no result rows. Exists for connection
    /// setup and test fixtures.
    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()>;

    /// The server version, when the backend reports one.
    async fn version(&self) -> crate::Result<Option<String>>;

    /// False once the underlying connection is known to be broken.
    fn is_healthy(&self) -> bool;

    /// The SQL family this connection speaks.
    fn sql_family(&self) -> SqlFamily;
}

/// Runs one connector operation, logging the query and elapsed time.
#[cfg(any(feature = "postgresql", feature = "mysql", feature = "sqlite", feature = "mssql"))]
pub(crate) async fn timed<F, T, U>(tag: &'static str, query: &str, f: F) -> crate::Result<T>
where
    F: FnOnce() -> U,
    U: std::future::Future<Output = crate::Result<T>>,
{
    let start = std::time::Instant::now();
    let res = f().await;
    let result = if res.is_ok() { "success" } else { "error" };

    tracing::debug!(
        query = %query,
        duration_ms = start.elapsed().as_millis() as u64,
        result,
        "{tag}"
    );

    res
}
