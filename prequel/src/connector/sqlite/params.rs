use crate::error::{Error, ErrorKind};
use std::path::Path;

pub(crate) const DEFAULT_SQLITE_DATABASE: &str = "main";

/// A parsed SQLite connection string.
///
/// Accepts `sqlite:path`, `sqlite://path`, `file:path` or a bare filesystem
/// path. The magic path `:memory:` selects an in-memory database.
///
/// Query parameters:
///
/// - `db_name` the name the database is attached under. Defaults to `main`.
/// - `socket_timeout` accepted for symmetry with the server backends and
///   ignored, SQLite connections perform no socket I/O.
#[derive(Debug, Clone)]
pub struct SqliteParams {
    /// This is not a `PathBuf` because the database is attached under a
    /// UTF-8 name derived from it.
    pub file_path: String,
    pub db_name: String,
}

impl TryFrom<&str> for SqliteParams {
    type Error = Error;

    fn try_from(path: &str) -> crate::Result<Self> {
        let path = if let Some(stripped) = path.strip_prefix("file:") {
            stripped
        } else {
            path.strip_prefix("sqlite:").unwrap_or(path)
        };

        // `sqlite://dev.db` carries an empty authority part before the path.
        let path = if path != ":memory:" {
            path.strip_prefix("//").unwrap_or(path)
        } else {
            path
        };

        let mut parts = path.splitn(2, '?');
        let file_path = parts.next().unwrap_or(path);

        if Path::new(file_path).is_dir() {
            let kind =
                ErrorKind::DatabaseUrlIsInvalid(format!("`{file_path}` is a directory, not a SQLite database file."));

            return Err(Error::builder(kind).build());
        }

        let mut db_name = None;

        if let Some(query) = parts.next() {
            for kv in query.split('&') {
                let (k, v) = match kv.split_once('=') {
                    Some(kv) => kv,
                    None => (kv, ""),
                };

                match k {
                    "db_name" => {
                        db_name = Some(v.to_owned());
                    }
                    "socket_timeout" => {
                        tracing::trace!(message = "SQLite connections do not time out, ignoring", param = k);
                    }
                    _ => {
                        tracing::trace!(message = "Discarding connection string param", param = k);
                    }
                };
            }
        }

        Ok(Self {
            file_path: file_path.to_owned(),
            db_name: db_name.unwrap_or_else(|| DEFAULT_SQLITE_DATABASE.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_paths_and_prefixed_urls_agree() {
        for url in ["dev.db", "sqlite:dev.db", "sqlite://dev.db", "file:dev.db"] {
            let params = SqliteParams::try_from(url).unwrap();

            assert_eq!(params.file_path, "dev.db", "for {url}");
            assert_eq!(params.db_name, "main");
        }
    }

    #[test]
    fn absolute_paths_survive_the_authority_form() {
        let params = SqliteParams::try_from("sqlite:///var/db/app.db").unwrap();

        assert_eq!(params.file_path, "/var/db/app.db");
    }

    #[test]
    fn memory_paths_are_preserved() {
        for url in [":memory:", "sqlite::memory:", "file::memory:"] {
            let params = SqliteParams::try_from(url).unwrap();

            assert_eq!(params.file_path, ":memory:", "for {url}");
        }
    }

    #[test]
    fn db_name_can_be_overridden() {
        let params = SqliteParams::try_from("sqlite:dev.db?db_name=describe").unwrap();

        assert_eq!(params.db_name, "describe");
    }

    #[test]
    fn socket_timeout_is_accepted_and_ignored() {
        let params = SqliteParams::try_from("sqlite:dev.db?socket_timeout=5").unwrap();

        assert_eq!(params.file_path, "dev.db");
    }

    #[test]
    fn directories_are_not_database_files() {
        let err = SqliteParams::try_from("/").unwrap_err();

        assert!(matches!(err.kind(), ErrorKind::DatabaseUrlIsInvalid(_)));
    }
}
