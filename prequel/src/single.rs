//! A single connection abstraction to a SQL database.

use crate::connector::{self, ConnectionInfo, Describer};
use async_trait::async_trait;
use query_metadata::{QueryDescription, SqlFamily};
use std::{fmt, sync::Arc};

#[cfg(feature = "sqlite")]
use crate::connector::sqlite::DEFAULT_SQLITE_DATABASE;

/// A single connection to a database, dispatching to the right connector for
/// the URL scheme.
#[derive(Clone)]
pub struct Prequel {
    inner: Arc<dyn Describer>,
    connection_info: Arc<ConnectionInfo>,
}

impl fmt::Debug for Prequel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.connection_info)
    }
}

impl Prequel {
    /// Opens a new connection to the database behind the given URL. See the
    /// [crate level documentation] for the URL structure.
    ///
    /// [crate level documentation]: ../index.html
    pub async fn new(url_str: &str) -> crate::Result<Self> {
        let connection_info = ConnectionInfo::from_url(url_str)?;

        let inner: Arc<dyn Describer> = match &connection_info {
            #[cfg(feature = "postgresql")]
            ConnectionInfo::Postgres(url) => Arc::new(connector::PostgreSql::new(url.clone()).await?),
            #[cfg(feature = "mysql")]
            ConnectionInfo::Mysql(url) => Arc::new(connector::Mysql::new(url.clone()).await?),
            #[cfg(feature = "mssql")]
            ConnectionInfo::Mssql(url) => Arc::new(connector::Mssql::new(url.clone()).await?),
            #[cfg(feature = "sqlite")]
            ConnectionInfo::Sqlite { file_path, .. } => Arc::new(connector::Sqlite::new(file_path)?),
            #[cfg(feature = "sqlite")]
            ConnectionInfo::InMemorySqlite { .. } => Arc::new(connector::Sqlite::new_in_memory()?),
        };

        Ok(Self {
            inner,
            connection_info: Arc::new(connection_info),
        })
    }

    /// Opens a connection to a fresh in-memory SQLite database.
    #[cfg(feature = "sqlite")]
    pub fn new_in_memory() -> crate::Result<Self> {
        Ok(Self {
            inner: Arc::new(connector::Sqlite::new_in_memory()?),
            connection_info: Arc::new(ConnectionInfo::InMemorySqlite {
                db_name: DEFAULT_SQLITE_DATABASE.to_owned(),
            }),
        })
    }

    /// Info about the connection and underlying database.
    pub fn connection_info(&self) -> &ConnectionInfo {
        &self.connection_info
    }
}

#[async_trait]
impl Describer for Prequel {
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription> {
        self.inner.describe(sql).await
    }

    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()> {
        self.inner.raw_cmd(cmd).await
    }

    async fn version(&self) -> crate::Result<Option<String>> {
        self.inner.version().await
    }

    fn is_healthy(&self) -> bool {
        self.inner.is_healthy()
    }

    fn sql_family(&self) -> SqlFamily {
        self.connection_info.sql_family()
    }
}
