use super::column_type::column_type;
use super::params::SqliteParams;
use crate::connector::{Describer, describer};
use async_trait::async_trait;
use query_metadata::{DescribedColumn, DescribedParameter, Nullability, QueryDescription, SqlFamily};
use tokio::sync::Mutex;

/// A connector interface for an SQLite database.
pub struct Sqlite {
    client: Mutex<rusqlite::Connection>,
}

impl TryFrom<&str> for Sqlite {
    type Error = crate::error::Error;

    fn try_from(path: &str) -> crate::Result<Self> {
        let params = SqliteParams::try_from(path)?;
        let conn = rusqlite::Connection::open(params.file_path.as_str())?;

        Ok(Sqlite {
            client: Mutex::new(conn),
        })
    }
}

impl Sqlite {
    /// Opens the database file, creating it when absent.
    pub fn new(path: &str) -> crate::Result<Self> {
        Self::try_from(path)
    }

    /// Opens a new SQLite database in memory.
    pub fn new_in_memory() -> crate::Result<Self> {
        let client = rusqlite::Connection::open_in_memory()?;

        Ok(Sqlite {
            client: Mutex::new(client),
        })
    }
}

#[async_trait]
impl Describer for Sqlite {
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription> {
        describer::timed("sqlite.describe", sql, || async move {
            let client = self.client.lock().await;

            let stmt = client.prepare(sql)?;

            // Placeholders are untyped, values take any storage class.
            let parameters = (0..stmt.parameter_count())
                .map(|_| DescribedParameter::untyped())
                .collect();

            // A prepared statement carries no nullability metadata, every
            // column stays unknown.
            let columns = stmt
                .columns()
                .iter()
                .map(|column| {
                    DescribedColumn::new(column.name(), column_type(column.decl_type()), Nullability::Unknown)
                })
                .collect();

            Ok(QueryDescription { parameters, columns })
        })
        .await
    }

    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()> {
        describer::timed("sqlite.raw_cmd", cmd, || async move {
            let client = self.client.lock().await;

            client.execute_batch(cmd)?;

            Ok(())
        })
        .await
    }

    async fn version(&self) -> crate::Result<Option<String>> {
        Ok(Some(rusqlite::version().to_owned()))
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn sql_family(&self) -> SqlFamily {
        SqlFamily::Sqlite
    }
}
