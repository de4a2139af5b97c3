use std::path::PathBuf;

/// Where the resolver finds a database and a metadata cache.
///
/// The defaults resolve nothing: no database URL and no forced offline
/// mode. Use [`ResolverOpts::from_env`] for the environment contract build
/// scripts rely on, or fill the fields directly.
#[derive(Debug, Clone, Default)]
pub struct ResolverOpts {
    /// Connection string of the database to describe queries against.
    pub database_url: Option<String>,
    /// Never connect, resolve from the metadata cache only.
    pub offline: bool,
    /// Root directory of the metadata cache. `None` means `.prequel` in
    /// the current working directory.
    pub cache_dir: Option<PathBuf>,
    /// Write every live description through to the metadata cache.
    pub record: bool,
}

impl ResolverOpts {
    /// Reads the resolver configuration from the environment.
    ///
    /// - `DATABASE_URL` is the connection string for live resolution.
    /// - `PREQUEL_OFFLINE` forces offline mode when set to `1` or `true`.
    /// - `PREQUEL_OFFLINE_DIR` overrides the metadata cache directory.
    ///
    /// Recording is never switched on from the environment.
    pub fn from_env() -> Self {
        ResolverOpts {
            database_url: non_empty_env("DATABASE_URL"),
            offline: non_empty_env("PREQUEL_OFFLINE").is_some_and(|value| is_truthy(&value)),
            cache_dir: non_empty_env("PREQUEL_OFFLINE_DIR").map(PathBuf::from),
            record: false,
        }
    }

    pub(crate) fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(metadata_cache::DEFAULT_CACHE_DIR))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
