//! Filesystem store for query metadata.
//!
//! Each described query is persisted as one JSON file under a cache directory
//! (conventionally `.prequel/` at the workspace root), named after the SHA-256
//! of the exact query text. Builds without a reachable database read these
//! files instead of connecting.

use query_metadata::QueryMetadata;
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The conventional cache directory name, relative to the workspace root.
pub const DEFAULT_CACHE_DIR: &str = ".prequel";

/// Lowercase hex SHA-256 of the query text.
///
/// The hash is the cache identity. It is computed over the exact bytes of the
/// query string, so whitespace and casing matter.
pub fn query_hash(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("error reading or writing the metadata cache at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata cache entry at `{}`", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "the metadata cache entry at `{}` does not match its file name: \
         the file claims hash {expected}, but its query hashes to {actual}",
        .path.display()
    )]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl CacheError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// A handle on one metadata cache directory.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    root: PathBuf,
}

impl MetadataCache {
    /// Opens a cache rooted at the given directory. The directory does not
    /// have to exist yet; `store` creates it on demand.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        MetadataCache { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the cache directory exists on disk.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// The path an entry with the given hash lives at.
    pub fn entry_path(&self, hash: &str) -> PathBuf {
        self.root.join(format!("query-{hash}.json"))
    }

    /// Persists one metadata entry, returning the path it was written to.
    ///
    /// The entry is written to a temporary sibling and renamed over the
    /// target, so concurrent builders never observe a torn file.
    pub fn store(&self, metadata: &QueryMetadata) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.root).map_err(|err| CacheError::io(&self.root, err))?;

        let hash = query_hash(&metadata.query);
        let target = self.entry_path(&hash);
        let tmp = self
            .root
            .join(format!(".query-{hash}.{}.tmp", std::process::id()));

        let mut json = serde_json::to_string_pretty(metadata).map_err(|err| CacheError::Json {
            path: target.clone(),
            source: err,
        })?;
        json.push('\n');

        fs::write(&tmp, json).map_err(|err| CacheError::io(&tmp, err))?;
        fs::rename(&tmp, &target).map_err(|err| CacheError::io(&target, err))?;

        tracing::debug!(hash = %hash, path = %target.display(), "stored query metadata");

        Ok(target)
    }

    /// Loads the entry with the given hash. `Ok(None)` when no such entry
    /// exists.
    ///
    /// The entry's query is re-hashed and compared against the requested
    /// hash, so a stale or hand-edited file is an error rather than silently
    /// served.
    pub fn load(&self, hash: &str) -> Result<Option<QueryMetadata>, CacheError> {
        let path = self.entry_path(hash);

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(hash = %hash, "no cached metadata for query");
                return Ok(None);
            }
            Err(err) => return Err(CacheError::io(&path, err)),
        };

        let metadata: QueryMetadata =
            serde_json::from_str(&json).map_err(|err| CacheError::Json {
                path: path.clone(),
                source: err,
            })?;

        let actual = query_hash(&metadata.query);

        if actual != hash {
            return Err(CacheError::HashMismatch {
                path,
                expected: hash.to_owned(),
                actual,
            });
        }

        tracing::debug!(hash = %hash, "loaded cached query metadata");

        Ok(Some(metadata))
    }

    /// Every valid entry in the cache, sorted by hash.
    ///
    /// Files that do not look like cache entries are ignored; entries that
    /// exist but cannot be read or verified are errors.
    pub fn entries(&self) -> Result<Vec<(String, QueryMetadata)>, CacheError> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CacheError::io(&self.root, err)),
        };

        let mut entries = Vec::new();

        for entry in dir {
            let entry = entry.map_err(|err| CacheError::io(&self.root, err))?;
            let file_name = entry.file_name();

            let Some(hash) = file_name.to_str().and_then(entry_hash) else {
                continue;
            };

            match self.load(hash)? {
                Some(metadata) => entries.push((hash.to_owned(), metadata)),
                // Raced with a concurrent prune. Skip.
                None => continue,
            }
        }

        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(entries)
    }
}

fn entry_hash(file_name: &str) -> Option<&str> {
    let hash = file_name.strip_prefix("query-")?.strip_suffix(".json")?;

    if !hash.is_empty() && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(hash)
    } else {
        None
    }
}
