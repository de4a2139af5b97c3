use crate::error::{Error, ErrorKind};
use tokio_postgres::error::DbError;

impl From<tokio_postgres::error::Error> for Error {
    fn from(e: tokio_postgres::error::Error) -> Error {
        if e.is_closed() {
            return Error::builder(ErrorKind::ConnectionClosed).build();
        }

        if let Some(db_error) = e.as_db_error() {
            return db_error.into();
        }

        if let Some(tls_error) = try_extracting_tls_error(&e) {
            return tls_error;
        }

        if let Some(io_error) = try_extracting_io_error(&e) {
            return io_error;
        }

        let reason = format!("{e}");
        let code = e.code().map(|c| c.code().to_string());

        let mut builder = Error::builder(ErrorKind::QueryError(e.into()));

        if let Some(code) = code {
            builder.set_original_code(code);
        }

        builder.set_original_message(reason);
        builder.build()
    }
}

impl From<&DbError> for Error {
    fn from(value: &DbError) -> Self {
        let code = value.code().code();
        let message = value.message();

        match code {
            // password authentication failed for user "postgres"
            "28P01" | "28000" => {
                let user = message.split('"').nth(1).into();
                let kind = ErrorKind::AuthenticationFailed { user };
                let mut builder = Error::builder(kind);

                builder.set_original_code(code);
                builder.set_original_message(message);

                builder.build()
            }
            // database "tests" does not exist
            "3D000" => {
                let db_name = message.split('"').nth(1).into();
                let kind = ErrorKind::DatabaseDoesNotExist { db_name };
                let mut builder = Error::builder(kind);

                builder.set_original_code(code);
                builder.set_original_message(message);

                builder.build()
            }
            // relation "cat" does not exist
            "42P01" => {
                let table = message.split('"').nth(1).into();
                let kind = ErrorKind::TableDoesNotExist { table };
                let mut builder = Error::builder(kind);

                builder.set_original_code(code);
                builder.set_original_message(message);

                builder.build()
            }
            // column "meow" does not exist
            "42703" => {
                let column = message.split('"').nth(1).into();
                let kind = ErrorKind::ColumnNotFound { column };
                let mut builder = Error::builder(kind);

                builder.set_original_code(code);
                builder.set_original_message(message);

                builder.build()
            }
            _ => {
                let kind = ErrorKind::QueryError(Box::new(value.clone()));

                let mut builder = Error::builder(kind);
                builder.set_original_code(code);
                builder.set_original_message(message);

                builder.build()
            }
        }
    }
}

fn try_extracting_tls_error(err: &tokio_postgres::error::Error) -> Option<Error> {
    use std::error::Error as _;

    err.source()
        .and_then(|cause| cause.downcast_ref::<native_tls::Error>())
        .map(|e| {
            Error::builder(ErrorKind::TlsError {
                message: e.to_string(),
            })
            .build()
        })
}

fn try_extracting_io_error(err: &tokio_postgres::error::Error) -> Option<Error> {
    use std::error::Error as _;

    err.source()
        .and_then(|cause| cause.downcast_ref::<std::io::Error>())
        .map(|io_error| {
            Error::builder(ErrorKind::ConnectionError(Box::new(std::io::Error::new(
                io_error.kind(),
                format!("{io_error}"),
            ))))
            .build()
        })
}
