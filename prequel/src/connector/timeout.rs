//! Timeout handling for the native connectors.

use crate::error::{Error, ErrorKind};
use std::{future::Future, time::Duration};

/// Applies the connect timeout to the future opening a connection.
pub(crate) async fn connect<T, F, E>(duration: Option<Duration>, f: F) -> crate::Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<Error>,
{
    match duration {
        Some(duration) => match tokio::time::timeout(duration, f).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(Error::builder(ErrorKind::ConnectTimeout).build()),
        },
        None => f.await.map_err(|err| err.into()),
    }
}

/// Applies the socket timeout to a future performing database I/O.
pub(crate) async fn socket<T, F, E>(duration: Option<Duration>, f: F) -> crate::Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<Error>,
{
    match duration {
        Some(duration) => match tokio::time::timeout(duration, f).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(Error::builder(ErrorKind::SocketTimeout).build()),
        },
        None => f.await.map_err(|err| err.into()),
    }
}
