use super::column_type::column_type;
use super::url::MysqlUrl;
use crate::connector::{Describer, describer, timeout};
use async_trait::async_trait;
use futures::lock::Mutex;
use mysql_async::{self as my, consts::ColumnFlags, prelude::Queryable};
use query_metadata::{DescribedColumn, DescribedParameter, Nullability, QueryDescription, SqlFamily};
use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

/// A connector interface for the MySQL database. MariaDB connections use the
/// same connector.
pub struct Mysql {
    conn: Mutex<my::Conn>,
    socket_timeout: Option<Duration>,
    is_healthy: AtomicBool,
}

impl Mysql {
    /// Creates a new connection to a MySQL server.
    pub async fn new(url: MysqlUrl) -> crate::Result<Self> {
        let conn = timeout::connect(url.connect_timeout(), my::Conn::new(url.to_opts_builder())).await?;

        Ok(Self {
            conn: Mutex::new(conn),
            socket_timeout: url.socket_timeout(),
            is_healthy: AtomicBool::new(true),
        })
    }

    async fn perform_io<F, T>(&self, fut: F) -> crate::Result<T>
    where
        F: Future<Output = std::result::Result<T, my::Error>>,
    {
        match timeout::socket(self.socket_timeout, fut).await {
            Err(e) if e.is_closed() => {
                self.is_healthy.store(false, Ordering::SeqCst);
                Err(e)
            }
            res => res,
        }
    }
}

#[async_trait]
impl Describer for Mysql {
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription> {
        describer::timed("mysql.describe", sql, || async move {
            let mut conn = self.conn.lock().await;

            let stmt = self.perform_io(conn.prep(sql)).await?;

            // The binary protocol reports every placeholder as an untyped
            // string, so only the count is usable.
            let parameters = (0..stmt.num_params())
                .map(|_| DescribedParameter::untyped())
                .collect();

            let columns = stmt
                .columns()
                .iter()
                .map(|column| {
                    let nullability = if column.flags().contains(ColumnFlags::NOT_NULL_FLAG) {
                        Nullability::NonNull
                    } else {
                        Nullability::Nullable
                    };

                    DescribedColumn::new(column.name_str().into_owned(), column_type(column), nullability)
                })
                .collect();

            self.perform_io(conn.close(stmt)).await?;

            Ok(QueryDescription { parameters, columns })
        })
        .await
    }

    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()> {
        describer::timed("mysql.raw_cmd", cmd, || async move {
            let mut conn = self.conn.lock().await;

            self.perform_io(conn.query_drop(cmd)).await
        })
        .await
    }

    async fn version(&self) -> crate::Result<Option<String>> {
        let mut conn = self.conn.lock().await;

        self.perform_io(conn.query_first("SELECT @@GLOBAL.version")).await
    }

    fn is_healthy(&self) -> bool {
        self.is_healthy.load(Ordering::SeqCst)
    }

    fn sql_family(&self) -> SqlFamily {
        SqlFamily::Mysql
    }
}
