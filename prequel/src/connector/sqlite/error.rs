use std::fmt;

use crate::error::{Error, ErrorKind};
use rusqlite::ffi;

#[derive(Debug)]
pub struct SqliteError {
    pub extended_code: i32,
    pub message: Option<String>,
}

impl fmt::Display for SqliteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error code {}: {}",
            self.extended_code,
            ffi::code_to_str(self.extended_code)
        )
    }
}

impl std::error::Error for SqliteError {}

impl SqliteError {
    pub fn new(extended_code: i32, message: Option<String>) -> Self {
        Self { extended_code, message }
    }

    pub fn primary_code(&self) -> i32 {
        self.extended_code & 0xFF
    }
}

impl From<SqliteError> for Error {
    fn from(error: SqliteError) -> Self {
        match error {
            SqliteError { extended_code, message } if error.primary_code() == ffi::SQLITE_BUSY => {
                let mut builder = Error::builder(ErrorKind::SocketTimeout);
                builder.set_original_code(format!("{extended_code}"));

                if let Some(description) = message {
                    builder.set_original_message(description);
                }

                builder.build()
            }

            SqliteError {
                extended_code,
                ref message,
            } => match message {
                Some(d) if d.starts_with("no such table") => {
                    let table = d.split(": ").last().into();
                    let kind = ErrorKind::TableDoesNotExist { table };

                    let mut builder = Error::builder(kind);
                    builder.set_original_code(format!("{extended_code}"));
                    builder.set_original_message(d);

                    builder.build()
                }
                Some(d) if d.contains("has no column named") => {
                    let column = d.split(" has no column named ").last().into();
                    let kind = ErrorKind::ColumnNotFound { column };

                    let mut builder = Error::builder(kind);
                    builder.set_original_code(format!("{extended_code}"));
                    builder.set_original_message(d);

                    builder.build()
                }
                Some(d) if d.starts_with("no such column: ") => {
                    let column = d.split("no such column: ").last().into();
                    let kind = ErrorKind::ColumnNotFound { column };

                    let mut builder = Error::builder(kind);
                    builder.set_original_code(format!("{extended_code}"));
                    builder.set_original_message(d);

                    builder.build()
                }
                _ => {
                    let description = message.as_ref().map(|d| d.to_string());
                    let mut builder = Error::builder(ErrorKind::QueryError(error.into()));
                    builder.set_original_code(format!("{extended_code}"));

                    if let Some(description) = description {
                        builder.set_original_message(description);
                    }

                    builder.build()
                }
            },
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        match e {
            rusqlite::Error::InvalidQuery => {
                let mut builder = Error::builder(ErrorKind::QueryError(e.into()));

                builder.set_original_message(
                    "Could not interpret the query or its parameters. Check the syntax and parameter types.",
                );

                builder.build()
            }
            rusqlite::Error::ExecuteReturnedResults => {
                let mut builder = Error::builder(ErrorKind::QueryError(e.into()));
                builder.set_original_message("Execute returned results, which is not allowed in SQLite.");

                builder.build()
            }

            rusqlite::Error::SqliteFailure(ffi::Error { code: _, extended_code }, message) => {
                SqliteError::new(extended_code, message).into()
            }

            rusqlite::Error::SqlInputError {
                error: ffi::Error { extended_code, .. },
                msg,
                ..
            } => SqliteError::new(extended_code, Some(msg)).into(),

            e => Error::builder(ErrorKind::QueryError(e.into())).build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Name;

    #[test]
    fn busy_errors_are_timeouts() {
        let error: Error = SqliteError::new(ffi::SQLITE_BUSY, Some("database is locked".to_owned())).into();

        assert!(matches!(error.kind(), ErrorKind::SocketTimeout));
        assert_eq!(Some("5"), error.original_code());
    }

    #[test]
    fn extended_busy_codes_share_the_primary_code() {
        let error: Error = SqliteError::new(ffi::SQLITE_BUSY_RECOVERY, None).into();

        assert!(matches!(error.kind(), ErrorKind::SocketTimeout));
    }

    #[test]
    fn missing_tables_carry_the_name() {
        let error: Error = SqliteError::new(1, Some("no such table: products".to_owned())).into();

        assert!(matches!(
            error.kind(),
            ErrorKind::TableDoesNotExist {
                table: Name::Available(table)
            } if table == "products"
        ));
    }

    #[test]
    fn missing_columns_carry_the_name() {
        let error: Error = SqliteError::new(1, Some("no such column: price".to_owned())).into();

        assert!(matches!(
            error.kind(),
            ErrorKind::ColumnNotFound {
                column: Name::Available(column)
            } if column == "price"
        ));
    }

    #[test]
    fn syntax_errors_keep_the_original_message() {
        let error: Error = SqliteError::new(1, Some("near \"SELEC\": syntax error".to_owned())).into();

        assert!(matches!(error.kind(), ErrorKind::QueryError(_)));
        assert_eq!(Some("1"), error.original_code());
        assert_eq!(Some("near \"SELEC\": syntax error"), error.original_message());
    }
}
