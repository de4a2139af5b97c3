use super::column_type::column_type;
use super::url::MssqlUrl;
use crate::{
    connector::{Describer, describer, timeout},
    error::{Error, ErrorKind},
};
use async_trait::async_trait;
use futures::lock::Mutex;
use query_metadata::{DescribedColumn, DescribedParameter, Nullability, QueryDescription, SqlFamily};
use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tiberius::{Client, Config, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// A connector interface for the SQL Server database.
pub struct Mssql {
    client: Mutex<Client<Compat<TcpStream>>>,
    socket_timeout: Option<Duration>,
    is_healthy: AtomicBool,
}

impl Mssql {
    /// Creates a new connection to SQL Server.
    pub async fn new(url: MssqlUrl) -> crate::Result<Self> {
        let config = Config::from_jdbc_string(url.connection_string())?;
        let tcp = TcpStream::connect_named(&config).await?;

        let connecting = async {
            match Client::connect(config, tcp.compat_write()).await {
                Ok(client) => Ok(client),
                Err(tiberius::error::Error::Routing { host, port }) => {
                    let mut config = Config::from_jdbc_string(url.connection_string())?;
                    config.host(host);
                    config.port(port);

                    let tcp = TcpStream::connect_named(&config).await?;
                    Client::connect(config, tcp.compat_write()).await
                }
                Err(e) => Err(e),
            }
        };

        let client = timeout::connect(url.connect_timeout(), connecting).await?;

        Ok(Self {
            client: Mutex::new(client),
            socket_timeout: url.socket_timeout(),
            is_healthy: AtomicBool::new(true),
        })
    }

    async fn perform_io<F, T>(&self, fut: F) -> crate::Result<T>
    where
        F: Future<Output = std::result::Result<T, tiberius::error::Error>>,
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
impl Describer for Mssql {
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription> {
        describer::timed("mssql.describe", sql, || async move {
            let mut client = self.client.lock().await;

            let mut query = tiberius::Query::new("EXEC sp_describe_undeclared_parameters @tsql = @P1");
            query.bind(sql);

            let rows = self.perform_io(query.query(&mut client)).await?.into_first_result().await?;

            let mut undeclared = Vec::with_capacity(rows.len());

            for row in rows.iter() {
                let ordinal = required_field::<i32>(row, "parameter_ordinal")?;
                let name = required_field::<&str>(row, "name")?;
                let native_type = native_type_name(row, "suggested_system_type_name", "suggested_user_type_name")?;

                undeclared.push((ordinal, name.to_owned(), native_type.to_owned()));
            }

            // The procedure does not promise any row order.
            undeclared.sort_by_key(|(ordinal, _, _)| *ordinal);

            // The result set analysis requires every referenced parameter to
            // be declared, so the inferred declarations feed the second call.
            let declarations = undeclared
                .iter()
                .map(|(_, name, native_type)| format!("{name} {native_type}"))
                .collect::<Vec<_>>()
                .join(", ");

            let parameters = undeclared
                .into_iter()
                .map(|(_, name, native_type)| DescribedParameter::named(name, column_type(&native_type)))
                .collect();

            let mut query = tiberius::Query::new("EXEC sp_describe_first_result_set @tsql = @P1, @params = @P2");
            query.bind(sql);
            query.bind(if declarations.is_empty() { None } else { Some(declarations) });

            let rows = self.perform_io(query.query(&mut client)).await?.into_first_result().await?;

            let mut columns = Vec::with_capacity(rows.len());

            for row in rows.iter() {
                if required_field::<bool>(row, "is_hidden")? {
                    continue;
                }

                let name = row.try_get::<&str, _>("name")?.unwrap_or_default();
                let nullable = required_field::<bool>(row, "is_nullable")?;
                let native_type = native_type_name(row, "system_type_name", "user_type_name")?;

                columns.push(DescribedColumn::new(
                    name,
                    column_type(native_type),
                    Nullability::known(nullable),
                ));
            }

            Ok(QueryDescription { parameters, columns })
        })
        .await
    }

    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()> {
        describer::timed("mssql.raw_cmd", cmd, || async move {
            let mut client = self.client.lock().await;
            self.perform_io(client.simple_query(cmd)).await?.into_results().await?;
            Ok(())
        })
        .await
    }

    async fn version(&self) -> crate::Result<Option<String>> {
        let mut client = self.client.lock().await;

        let rows = self
            .perform_io(client.simple_query("SELECT @@VERSION"))
            .await?
            .into_first_result()
            .await?;

        let version = match rows.first() {
            Some(row) => row.try_get::<&str, _>(0)?.map(ToString::to_string),
            None => None,
        };

        Ok(version)
    }

    fn is_healthy(&self) -> bool {
        self.is_healthy.load(Ordering::SeqCst)
    }

    fn sql_family(&self) -> SqlFamily {
        SqlFamily::Mssql
    }
}

fn required_field<'a, T: tiberius::FromSql<'a>>(row: &'a tiberius::Row, column: &'static str) -> crate::Result<T> {
    row.try_get(column)?.ok_or_else(|| {
        Error::builder(ErrorKind::conversion(format!(
            "Unexpected NULL in `{column}` while describing a query."
        )))
        .build()
    })
}

/// CLR types report no system type, the user type name is all there is.
fn native_type_name<'a>(
    row: &'a tiberius::Row,
    system_column: &'static str,
    user_column: &'static str,
) -> crate::Result<&'a str> {
    match row.try_get::<&str, _>(system_column)? {
        Some(name) => Ok(name),
        None => required_field(row, user_column),
    }
}
