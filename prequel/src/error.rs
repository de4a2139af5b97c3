//! Error module

mod name;

pub use name::Name;

use std::borrow::Cow;
use thiserror::Error as ThisError;

/// The error type used throughout the connectors. Wraps an [`ErrorKind`]
/// together with the original error code and message reported by the
/// database, when there was one.
#[derive(Debug, ThisError)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
    original_code: Option<String>,
    original_message: Option<String>,
}

impl Error {
    pub fn builder(kind: ErrorKind) -> ErrorBuilder {
        ErrorBuilder {
            kind,
            original_code: None,
            original_message: None,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The error code sent by the database, if available.
    pub fn original_code(&self) -> Option<&str> {
        self.original_code.as_deref()
    }

    /// The original error message sent by the database, if available.
    pub fn original_message(&self) -> Option<&str> {
        self.original_message.as_deref()
    }

    /// Whether the connection the error happened on is unusable from now on.
    pub fn is_closed(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectionClosed)
    }
}

#[derive(Debug)]
pub struct ErrorBuilder {
    kind: ErrorKind,
    original_code: Option<String>,
    original_message: Option<String>,
}

impl ErrorBuilder {
    pub fn set_original_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.original_code = Some(code.into());
        self
    }

    pub fn set_original_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.original_message = Some(message.into());
        self
    }

    pub fn build(self) -> Error {
        Error {
            kind: self.kind,
            original_code: self.original_code,
            original_message: self.original_message,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error("Error querying the database: {}", _0)]
    QueryError(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Error creating a database connection. ({})", _0)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("The provided database string is invalid. {}", _0)]
    DatabaseUrlIsInvalid(String),

    #[error("The provided arguments are not supported")]
    InvalidConnectionArguments,

    #[error("Database `{}` does not exist", db_name)]
    DatabaseDoesNotExist { db_name: Name },

    #[error("Access denied to database `{}`", db_name)]
    DatabaseAccessDenied { db_name: Name },

    #[error("Authentication failed for user `{}`", user)]
    AuthenticationFailed { user: Name },

    #[error("Table `{}` does not exist", table)]
    TableDoesNotExist { table: Name },

    #[error("Column `{}` could not be found", column)]
    ColumnNotFound { column: Name },

    #[error("Error opening a TLS connection. {}", message)]
    TlsError { message: String },

    #[error("Timed out when connecting to the database.")]
    ConnectTimeout,

    #[error("Timed out fetching a response from the database.")]
    SocketTimeout,

    #[error("The connection closed.")]
    ConnectionClosed,

    #[error("Conversion failed: {}", _0)]
    ConversionError(Cow<'static, str>),
}

impl ErrorKind {
    pub(crate) fn conversion(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ConversionError(message.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::builder(ErrorKind::DatabaseUrlIsInvalid(e.to_string())).build()
    }
}

#[cfg(feature = "mssql")]
impl From<connection_string::Error> for Error {
    fn from(e: connection_string::Error) -> Self {
        Error::builder(ErrorKind::DatabaseUrlIsInvalid(e.to_string())).build()
    }
}
