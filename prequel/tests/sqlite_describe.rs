//! Describe behavior over SQLite, the one backend that needs no server.

use pretty_assertions::assert_eq;
use prequel::{
    connector::Describer,
    error::{ErrorKind, Name},
    single::Prequel,
};
use query_metadata::{ColumnTypeFamily, Nullability, SqlFamily};

async fn conn_with_schema(ddl: &str) -> Prequel {
    test_setup::init_test_logger();

    let conn = Prequel::new_in_memory().unwrap();
    conn.raw_cmd(ddl).await.unwrap();

    conn
}

#[tokio::test]
async fn placeholders_are_counted_but_untyped() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").await;

    let description = conn
        .describe("SELECT id FROM cat WHERE name = ? AND id > ?")
        .await
        .unwrap();

    assert_eq!(description.parameter_count(), 2);

    for parameter in &description.parameters {
        assert_eq!(parameter.name, None);
        assert_eq!(parameter.tpe, None);
    }
}

#[tokio::test]
async fn column_names_and_declared_types_are_reported() {
    let conn = conn_with_schema(
        "CREATE TABLE cat (id INTEGER PRIMARY KEY, name TEXT NOT NULL, weight REAL, chipped BOOLEAN)",
    )
    .await;

    let description = conn
        .describe("SELECT id, name, weight, chipped FROM cat")
        .await
        .unwrap();

    let columns: Vec<(&str, &ColumnTypeFamily)> = description
        .columns
        .iter()
        .map(|column| (column.name.as_str(), &column.tpe.family))
        .collect();

    assert_eq!(
        columns,
        &[
            ("id", &ColumnTypeFamily::BigInt),
            ("name", &ColumnTypeFamily::String),
            ("weight", &ColumnTypeFamily::Double),
            ("chipped", &ColumnTypeFamily::Boolean),
        ]
    );

    assert_eq!(description.columns[0].tpe.full_data_type, "INTEGER");
}

#[tokio::test]
async fn result_column_nullability_is_never_known() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").await;

    let description = conn.describe("SELECT id, name FROM cat").await.unwrap();

    // Prepared statements carry no nullability metadata, even for columns
    // declared NOT NULL.
    for column in &description.columns {
        assert_eq!(column.nullability, Nullability::Unknown);
    }
}

#[tokio::test]
async fn aliases_are_reported_verbatim() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").await;

    let description = conn
        .describe(r#"SELECT name AS "name!" FROM cat"#)
        .await
        .unwrap();

    // Trailing override markers are a consumer concern. The connector
    // reports what the statement says.
    assert_eq!(description.columns[0].name, "name!");
}

#[tokio::test]
async fn expression_columns_have_no_declared_type() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY)").await;

    let description = conn.describe("SELECT COUNT(*) AS n FROM cat").await.unwrap();

    assert_eq!(description.columns[0].name, "n");
    assert_eq!(
        description.columns[0].tpe.family,
        ColumnTypeFamily::Unsupported("expression".to_owned())
    );
}

#[tokio::test]
async fn describing_a_write_does_not_execute_it() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY)").await;

    // A second execution would hit the primary key constraint.
    for _ in 0..2 {
        let description = conn.describe("INSERT INTO cat (id) VALUES (1)").await.unwrap();

        assert_eq!(description.parameter_count(), 0);
        assert!(description.columns.is_empty());
    }
}

#[tokio::test]
async fn missing_tables_error_with_the_table_name() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY)").await;

    let err = conn.describe("SELECT id FROM dog").await.unwrap_err();

    assert!(matches!(
        err.kind(),
        ErrorKind::TableDoesNotExist {
            table: Name::Available(table)
        } if table == "dog"
    ));
}

#[tokio::test]
async fn a_file_database_is_created_on_open() {
    test_setup::init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cats.db");
    let url = format!("file:{}", path.display());

    let conn = Prequel::new(&url).await.unwrap();

    assert_eq!(conn.connection_info().sql_family(), SqlFamily::Sqlite);
    assert!(path.exists());
    assert!(conn.is_healthy());
}

#[tokio::test]
async fn the_library_version_is_reported() {
    let conn = conn_with_schema("CREATE TABLE cat (id INTEGER PRIMARY KEY)").await;

    let version = conn.version().await.unwrap();

    assert!(version.is_some());
}
