use super::column_type::column_type;
use super::url::{PostgresUrl, SslAcceptMode};
use crate::{
    connector::{Describer, describer, timeout},
    error::{Error, ErrorKind},
};
use async_trait::async_trait;
use futures::future::FutureExt;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use query_metadata::{DescribedColumn, DescribedParameter, Nullability, QueryDescription, SqlFamily};
use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tokio_postgres::Client;

/// Looks up `attnotnull` for every column origin in one round trip. A miss
/// (dropped column, no origin) yields a NULL row.
const NULLABILITY_QUERY: &str = r#"
SELECT NOT pg_attribute.attnotnull AS nullable
FROM unnest($1::oid[], $2::int2[]) WITH ORDINALITY AS input(table_oid, column_id, ord)
LEFT JOIN pg_catalog.pg_attribute
    ON pg_attribute.attrelid = input.table_oid
    AND pg_attribute.attnum = input.column_id
ORDER BY input.ord
"#;

/// A connector interface for the PostgreSQL database.
pub struct PostgreSql {
    client: Client,
    socket_timeout: Option<Duration>,
    is_healthy: AtomicBool,
}

impl PostgreSql {
    /// Creates a new connection to a PostgreSQL server.
    pub async fn new(url: PostgresUrl) -> crate::Result<Self> {
        let config = url.to_config();

        let mut tls_builder = TlsConnector::builder();

        if url.ssl_accept_mode() == SslAcceptMode::AcceptInvalidCerts {
            tls_builder.danger_accept_invalid_certs(true);
        }

        let tls = MakeTlsConnector::new(tls_builder.build().map_err(|e| {
            Error::builder(ErrorKind::TlsError {
                message: e.to_string(),
            })
            .build()
        })?);

        let (client, conn) = timeout::connect(url.connect_timeout(), config.connect(tls)).await?;

        tokio::spawn(conn.map(|r| {
            if let Err(e) = r {
                tracing::error!("Error in PostgreSQL connection: {:?}", e);
            }
        }));

        let this = Self {
            client,
            socket_timeout: url.socket_timeout(),
            is_healthy: AtomicBool::new(true),
        };

        if url.schema() != super::url::DEFAULT_SCHEMA {
            this.raw_cmd(&format!("SET search_path = \"{}\"", url.schema())).await?;
        }

        Ok(this)
    }

    async fn perform_io<F, T>(&self, fut: F) -> crate::Result<T>
    where
        F: Future<Output = std::result::Result<T, tokio_postgres::error::Error>>,
    {
        match timeout::socket(self.socket_timeout, fut).await {
            Err(e) if e.is_closed() => {
                self.is_healthy.store(false, Ordering::SeqCst);
                Err(e)
            }
            res => res,
        }
    }

    /// Resolves nullability for the collected column origins in one batched
    /// catalog query. Columns without an origin (expressions, literals,
    /// aggregates) stay unknown.
    async fn column_nullabilities(&self, origins: &[Option<(u32, i16)>]) -> crate::Result<Vec<Nullability>> {
        let known: Vec<(u32, i16)> = origins.iter().flatten().copied().collect();

        if known.is_empty() {
            return Ok(vec![Nullability::Unknown; origins.len()]);
        }

        let table_oids: Vec<u32> = known.iter().map(|(table, _)| *table).collect();
        let column_ids: Vec<i16> = known.iter().map(|(_, column)| *column).collect();

        let rows = self
            .perform_io(self.client.query(NULLABILITY_QUERY, &[&table_oids, &column_ids]))
            .await?;

        let mut looked_up = rows.into_iter().map(|row| row.get::<_, Option<bool>>(0));

        let nullabilities = origins
            .iter()
            .map(|origin| match origin {
                Some(_) => match looked_up.next().flatten() {
                    Some(nullable) => Nullability::known(nullable),
                    None => Nullability::Unknown,
                },
                None => Nullability::Unknown,
            })
            .collect();

        Ok(nullabilities)
    }
}

#[async_trait]
impl Describer for PostgreSql {
    async fn describe(&self, sql: &str) -> crate::Result<QueryDescription> {
        describer::timed("postgres.describe", sql, || async move {
            let stmt = self.perform_io(self.client.prepare(sql)).await?;

            let parameters = stmt
                .params()
                .iter()
                .map(|ty| DescribedParameter::typed(column_type(ty)))
                .collect();

            let origins: Vec<Option<(u32, i16)>> = stmt
                .columns()
                .iter()
                .map(|column| column.table_oid().zip(column.column_id()))
                .collect();

            let nullabilities = self.column_nullabilities(&origins).await?;

            let columns = stmt
                .columns()
                .iter()
                .zip(nullabilities)
                .map(|(column, nullability)| {
                    DescribedColumn::new(column.name(), column_type(column.type_()), nullability)
                })
                .collect();

            Ok(QueryDescription { parameters, columns })
        })
        .await
    }

    async fn raw_cmd(&self, cmd: &str) -> crate::Result<()> {
        describer::timed("postgres.raw_cmd", cmd, || async move {
            self.perform_io(self.client.simple_query(cmd)).await?;
            Ok(())
        })
        .await
    }

    async fn version(&self) -> crate::Result<Option<String>> {
        let rows = self.perform_io(self.client.query("SELECT version()", &[])).await?;

        Ok(rows.first().map(|row| row.get(0)))
    }

    fn is_healthy(&self) -> bool {
        self.is_healthy.load(Ordering::SeqCst)
    }

    fn sql_family(&self) -> SqlFamily {
        SqlFamily::Postgres
    }
}
