use crate::error::{Error, ErrorKind};
use mysql_async as my;

/// A MySQL server error. Carried inside [`ErrorKind::QueryError`] when no
/// more specific kind applies.
#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
#[error("ERROR {} ({}): {}", state, code, message)]
pub struct MysqlError {
    pub code: u16,
    pub message: String,
    pub state: String,
}

impl From<&my::ServerError> for MysqlError {
    fn from(error: &my::ServerError) -> Self {
        MysqlError {
            code: error.code,
            message: error.message.clone(),
            state: error.state.clone(),
        }
    }
}

impl From<MysqlError> for Error {
    fn from(error: MysqlError) -> Self {
        let code = error.code;

        match code {
            1049 => {
                let db_name = error
                    .message
                    .split_whitespace()
                    .last()
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let kind = ErrorKind::DatabaseDoesNotExist { db_name };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
            1044 => {
                let db_name = error
                    .message
                    .split_whitespace()
                    .last()
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let kind = ErrorKind::DatabaseAccessDenied { db_name };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
            1045 => {
                let user = error
                    .message
                    .split_whitespace()
                    .nth(4)
                    .and_then(|s| s.split('@').next())
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let kind = ErrorKind::AuthenticationFailed { user };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
            1146 => {
                let table = error
                    .message
                    .split_whitespace()
                    .nth(1)
                    .and_then(|s| s.split('\'').nth(1))
                    .and_then(|s| s.split('.').last())
                    .into();

                let kind = ErrorKind::TableDoesNotExist { table };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
            1054 => {
                let column = error
                    .message
                    .split_whitespace()
                    .nth(2)
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let mut builder = Error::builder(ErrorKind::ColumnNotFound { column });

                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
            _ => {
                let kind = ErrorKind::QueryError(error.clone().into());

                let mut builder = Error::builder(kind);
                builder.set_original_code(format!("{code}"));
                builder.set_original_message(error.message);

                builder.build()
            }
        }
    }
}

impl From<my::Error> for Error {
    fn from(e: my::Error) -> Error {
        match e {
            my::Error::Io(my::IoError::Tls(err)) => Error::builder(ErrorKind::TlsError {
                message: err.to_string(),
            })
            .build(),
            my::Error::Io(my::IoError::Io(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                Error::builder(ErrorKind::ConnectionClosed).build()
            }
            my::Error::Io(io_error) => Error::builder(ErrorKind::ConnectionError(io_error.into())).build(),
            my::Error::Driver(e) => Error::builder(ErrorKind::QueryError(e.into())).build(),
            my::Error::Server(ref server_error) => {
                let mysql_error: MysqlError = server_error.into();
                mysql_error.into()
            }
            e => Error::builder(ErrorKind::QueryError(e.into())).build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Name;

    fn server_error(code: u16, message: &str) -> MysqlError {
        MysqlError {
            code,
            message: message.to_owned(),
            state: "HY000".to_owned(),
        }
    }

    #[test]
    fn unknown_database_errors_carry_the_name() {
        let error: Error = server_error(1049, "Unknown database 'describe'").into();

        assert!(matches!(
            error.kind(),
            ErrorKind::DatabaseDoesNotExist {
                db_name: Name::Available(name)
            } if name == "describe"
        ));
        assert_eq!(Some("1049"), error.original_code());
    }

    #[test]
    fn access_denied_errors_carry_the_user() {
        let error: Error =
            server_error(1045, "Access denied for user 'root'@'localhost' (using password: YES)").into();

        assert!(matches!(
            error.kind(),
            ErrorKind::AuthenticationFailed {
                user: Name::Available(user)
            } if user == "root"
        ));
    }

    #[test]
    fn missing_tables_strip_the_database_prefix() {
        let error: Error = server_error(1146, "Table 'describe.products' doesn't exist").into();

        assert!(matches!(
            error.kind(),
            ErrorKind::TableDoesNotExist {
                table: Name::Available(table)
            } if table == "products"
        ));
    }

    #[test]
    fn missing_columns_carry_the_name() {
        let error: Error = server_error(1054, "Unknown column 'prices' in 'field list'").into();

        assert!(matches!(
            error.kind(),
            ErrorKind::ColumnNotFound {
                column: Name::Available(column)
            } if column == "prices"
        ));
    }

    #[test]
    fn syntax_errors_stay_query_errors_with_the_original_code() {
        let error: Error = server_error(1064, "You have an error in your SQL syntax").into();

        assert!(matches!(error.kind(), ErrorKind::QueryError(_)));
        assert_eq!(Some("1064"), error.original_code());
        assert_eq!(
            Some("You have an error in your SQL syntax"),
            error.original_message()
        );
    }
}
