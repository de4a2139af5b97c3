use crate::error::{Error, ErrorKind};
use tiberius::error::IoErrorKind;

impl From<tiberius::error::Error> for Error {
    fn from(e: tiberius::error::Error) -> Error {
        match e {
            tiberius::error::Error::Io {
                kind: IoErrorKind::UnexpectedEof,
                message,
            } => {
                let mut builder = Error::builder(ErrorKind::ConnectionClosed);
                builder.set_original_message(message);
                builder.build()
            }
            e @ tiberius::error::Error::Io { .. } => Error::builder(ErrorKind::ConnectionError(e.into())).build(),
            tiberius::error::Error::Tls(message) => {
                let message = format!(
                    "The TLS settings didn't allow the connection to be established. Please review your connection string. (error: {message})"
                );

                Error::builder(ErrorKind::TlsError { message }).build()
            }
            tiberius::error::Error::Server(e) if e.code() == 18456 => {
                let user = e.message().split('\'').nth(1).into();
                let kind = ErrorKind::AuthenticationFailed { user };

                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{}", e.code()));
                builder.set_original_message(e.message().to_string());

                builder.build()
            }
            tiberius::error::Error::Server(e) if e.code() == 4060 => {
                let db_name = e.message().split('"').nth(1).into();
                let kind = ErrorKind::DatabaseDoesNotExist { db_name };

                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{}", e.code()));
                builder.set_original_message(e.message().to_string());

                builder.build()
            }
            tiberius::error::Error::Server(e) if e.code() == 208 => {
                let table = e
                    .message()
                    .split_whitespace()
                    .nth(3)
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let kind = ErrorKind::TableDoesNotExist { table };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{}", e.code()));
                builder.set_original_message(e.message().to_string());

                builder.build()
            }
            tiberius::error::Error::Server(e) if e.code() == 207 => {
                let column = e
                    .message()
                    .split_whitespace()
                    .nth(3)
                    .and_then(|s| s.split('\'').nth(1))
                    .into();

                let kind = ErrorKind::ColumnNotFound { column };
                let mut builder = Error::builder(kind);

                builder.set_original_code(format!("{}", e.code()));
                builder.set_original_message(e.message().to_string());

                builder.build()
            }
            tiberius::error::Error::Server(e) => {
                let kind = ErrorKind::QueryError(e.clone().into());

                let mut builder = Error::builder(kind);
                builder.set_original_code(format!("{}", e.code()));
                builder.set_original_message(e.message().to_string());

                builder.build()
            }
            e => Error::builder(ErrorKind::QueryError(e.into())).build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_unexpected_eof_closes_the_connection() {
        let error = tiberius::error::Error::Io {
            kind: IoErrorKind::UnexpectedEof,
            message: "unexpected EOF during handshake".to_string(),
        };

        let translated = Error::from(error);

        assert!(matches!(translated.kind(), ErrorKind::ConnectionClosed));
        assert!(translated.is_closed());
        assert_eq!(Some("unexpected EOF during handshake"), translated.original_message());
    }

    #[test]
    fn other_io_failures_are_connection_errors() {
        let error = tiberius::error::Error::Io {
            kind: IoErrorKind::ConnectionReset,
            message: "connection reset by peer".to_string(),
        };

        assert!(matches!(Error::from(error).kind(), ErrorKind::ConnectionError(_)));
    }

    #[test]
    fn tls_failures_point_at_the_connection_string() {
        let error = tiberius::error::Error::Tls("handshake failed".to_string());
        let translated = Error::from(error);

        match translated.kind() {
            ErrorKind::TlsError { message } => {
                assert!(message.contains("handshake failed"));
                assert!(message.contains("review your connection string"));
            }
            other => panic!("expected a TLS error, got {other:?}"),
        }
    }
}
