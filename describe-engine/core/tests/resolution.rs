//! Mode selection and cache behavior of the query resolver, exercised
//! against SQLite and hand-written cache entries.

use describe_core::{QueryResolver, ResolveError, ResolverOpts};
use metadata_cache::{MetadataCache, query_hash};
use pretty_assertions::assert_eq;
use prequel::{connector::Describer, single::Prequel};
use query_metadata::{
    ColumnType, ColumnTypeFamily, DescribedColumn, Nullability, QueryDescription, QueryMetadata, SqlFamily,
};
use std::path::Path;

fn offline_opts(cache_dir: &Path) -> ResolverOpts {
    ResolverOpts {
        offline: true,
        cache_dir: Some(cache_dir.to_owned()),
        ..Default::default()
    }
}

fn store_entry(cache_dir: &Path, family: SqlFamily, sql: &str, description: QueryDescription) {
    let metadata = QueryMetadata {
        family,
        query: sql.to_owned(),
        description,
    };

    MetadataCache::open(cache_dir).store(&metadata).unwrap();
}

#[tokio::test]
async fn no_database_url_and_no_cache_is_an_error() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let opts = ResolverOpts {
        cache_dir: Some(dir.path().join(".prequel")),
        ..Default::default()
    };

    let err = QueryResolver::new(opts).resolve("SELECT 1").await.unwrap_err();

    assert!(matches!(err, ResolveError::MissingDatabaseUrl), "{err:?}");
}

#[tokio::test]
async fn forced_offline_needs_a_cache_directory() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".prequel");

    let err = QueryResolver::new(offline_opts(&cache_dir))
        .resolve("SELECT 1")
        .await
        .unwrap_err();

    match err {
        ResolveError::OfflineCacheMissing { dir } => assert_eq!(dir, cache_dir),
        other => panic!("expected OfflineCacheMissing, got {other:?}"),
    }
}

#[tokio::test]
async fn forced_offline_reports_missing_entries_by_hash() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".prequel");
    std::fs::create_dir_all(&cache_dir).unwrap();

    let sql = "SELECT id FROM cat";
    let err = QueryResolver::new(offline_opts(&cache_dir))
        .resolve(sql)
        .await
        .unwrap_err();

    match err {
        ResolveError::CacheMiss { hash } => assert_eq!(hash, query_hash(sql)),
        other => panic!("expected CacheMiss, got {other:?}"),
    }
}

#[tokio::test]
async fn live_resolution_records_the_cache_and_replays_offline() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let url = format!("file:{}", dir.path().join("describe.db").display());
    let cache_dir = dir.path().join(".prequel");

    let conn = Prequel::new(&url).await.unwrap();
    conn.raw_cmd("CREATE TABLE cat (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)")
        .await
        .unwrap();

    let resolver = QueryResolver::new(ResolverOpts {
        database_url: Some(url),
        record: true,
        cache_dir: Some(cache_dir.clone()),
        ..Default::default()
    });

    let sql = "SELECT name, age FROM cat WHERE id = ?";
    let resolved = resolver.resolve(sql).await.unwrap();

    assert_eq!(resolved.hash, query_hash(sql));
    assert_eq!(resolved.family, SqlFamily::Sqlite);
    assert_eq!(resolved.description.parameter_count(), 1);

    let names: Vec<&str> = resolved
        .description
        .columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();

    assert_eq!(names, &["name", "age"]);

    // The recorded entry serves the same result without the database.
    let entries = MetadataCache::open(&cache_dir).entries().unwrap();
    assert_eq!(entries.len(), 1);

    let replayed = QueryResolver::new(offline_opts(&cache_dir)).resolve(sql).await.unwrap();

    assert_eq!(replayed, resolved);
}

#[tokio::test]
async fn live_resolution_without_recording_leaves_no_cache() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let url = format!("file:{}", dir.path().join("describe.db").display());
    let cache_dir = dir.path().join(".prequel");

    let conn = Prequel::new(&url).await.unwrap();
    conn.raw_cmd("CREATE TABLE cat (id INTEGER PRIMARY KEY)").await.unwrap();

    let resolver = QueryResolver::new(ResolverOpts {
        database_url: Some(url),
        cache_dir: Some(cache_dir.clone()),
        ..Default::default()
    });

    resolver.resolve("SELECT id FROM cat").await.unwrap();

    assert!(!cache_dir.exists());
}

#[tokio::test]
async fn the_cache_serves_as_fallback_without_a_database_url() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".prequel");

    let sql = "SELECT id FROM cat";
    let description = QueryDescription {
        parameters: Vec::new(),
        columns: vec![DescribedColumn::new(
            "id",
            ColumnType::pure(ColumnTypeFamily::BigInt),
            Nullability::NonNull,
        )],
    };

    store_entry(&cache_dir, SqlFamily::Sqlite, sql, description);

    let resolver = QueryResolver::new(ResolverOpts {
        cache_dir: Some(cache_dir),
        ..Default::default()
    });

    let resolved = resolver.resolve(sql).await.unwrap();

    assert_eq!(resolved.family, SqlFamily::Sqlite);
    assert_eq!(resolved.description.columns[0].name, "id");
}

#[tokio::test]
async fn column_overrides_apply_on_the_offline_path() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".prequel");

    let sql = "SELECT email AS \"email?\" FROM account";
    let description = QueryDescription {
        parameters: Vec::new(),
        columns: vec![DescribedColumn::new(
            "email?",
            ColumnType::pure(ColumnTypeFamily::String),
            Nullability::NonNull,
        )],
    };

    store_entry(&cache_dir, SqlFamily::Postgres, sql, description);

    let resolved = QueryResolver::new(offline_opts(&cache_dir)).resolve(sql).await.unwrap();
    let column = &resolved.description.columns[0];

    assert_eq!(column.name, "email");
    assert_eq!(column.nullability, Nullability::Nullable);
}

#[tokio::test]
async fn offline_resolution_rejects_a_mismatched_database_family() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".prequel");

    let sql = "SELECT id FROM cat";
    store_entry(&cache_dir, SqlFamily::Postgres, sql, QueryDescription::default());

    let opts = ResolverOpts {
        database_url: Some("mysql://root@localhost:3306/tests".to_owned()),
        offline: true,
        cache_dir: Some(cache_dir),
        ..Default::default()
    };

    let err = QueryResolver::new(opts).resolve(sql).await.unwrap_err();

    match err {
        ResolveError::FamilyMismatch { url, cache } => {
            assert_eq!(url, SqlFamily::Mysql);
            assert_eq!(cache, SqlFamily::Postgres);
        }
        other => panic!("expected FamilyMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn resolution_errors_surface_connector_errors() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let url = format!("file:{}", dir.path().join("describe.db").display());

    let resolver = QueryResolver::new(ResolverOpts {
        database_url: Some(url),
        cache_dir: Some(dir.path().join(".prequel")),
        ..Default::default()
    });

    // No such table.
    let err = resolver.resolve("SELECT id FROM missing").await.unwrap_err();

    assert!(matches!(err, ResolveError::Connector(_)), "{err:?}");
}
