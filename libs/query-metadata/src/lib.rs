//! The serializable model of a described query.
//!
//! A describe operation prepares a query against a live database and reports
//! what the server knows about it: the parameters the query takes and the
//! columns it produces, including their nullability. This crate holds that
//! model, shared between the connectors that produce it and the tooling that
//! caches and consumes it. No I/O happens here.

mod overrides;

pub use overrides::{NullabilityOverride, parse_column_override};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The SQL dialect family a connection or a cached entry belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SqlFamily {
    Postgres,
    Mysql,
    Sqlite,
    Mssql,
}

impl SqlFamily {
    /// The canonical lowercase name, as used in cache entries and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            SqlFamily::Postgres => "postgres",
            SqlFamily::Mysql => "mysql",
            SqlFamily::Sqlite => "sqlite",
            SqlFamily::Mssql => "mssql",
        }
    }

    pub fn is_postgres(self) -> bool {
        matches!(self, SqlFamily::Postgres)
    }

    pub fn is_mysql(self) -> bool {
        matches!(self, SqlFamily::Mysql)
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, SqlFamily::Sqlite)
    }

    pub fn is_mssql(self) -> bool {
        matches!(self, SqlFamily::Mssql)
    }
}

impl fmt::Display for SqlFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings that do not name a known SQL family.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownSqlFamily(pub String);

impl fmt::Display for UnknownSqlFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a known SQL family", self.0)
    }
}

impl std::error::Error for UnknownSqlFamily {}

impl FromStr for SqlFamily {
    type Err = UnknownSqlFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" | "postgresql" => Ok(SqlFamily::Postgres),
            "mysql" => Ok(SqlFamily::Mysql),
            "sqlite" => Ok(SqlFamily::Sqlite),
            "mssql" => Ok(SqlFamily::Mssql),
            other => Err(UnknownSqlFamily(other.to_owned())),
        }
    }
}

/// The family of a column or parameter type, abstracted over backends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ColumnTypeFamily {
    /// 32-bit integer types.
    Int,
    /// 64-bit integer types.
    BigInt,
    /// 32-bit floating point types.
    Float,
    /// 64-bit floating point types.
    Double,
    /// Arbitrary precision decimal types.
    Decimal,
    /// Boolean types.
    Boolean,
    /// String types.
    String,
    /// Binary types.
    Binary,
    /// Calendar date types.
    Date,
    /// Time-of-day types.
    Time,
    /// Date and time types, with or without an offset.
    DateTime,
    /// JSON types.
    Json,
    /// UUID types.
    Uuid,
    /// A named database enum. The name is empty when the protocol does not
    /// carry it (MySQL).
    Enum(String),
    /// A type the resolver has no mapping for. Carries the native name.
    Unsupported(String),
}

impl ColumnTypeFamily {
    pub fn as_enum_name(&self) -> Option<&str> {
        match self {
            ColumnTypeFamily::Enum(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, ColumnTypeFamily::Int)
    }

    pub fn is_bigint(&self) -> bool {
        matches!(self, ColumnTypeFamily::BigInt)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ColumnTypeFamily::String)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ColumnTypeFamily::Enum(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ColumnTypeFamily::Unsupported(_))
    }
}

impl fmt::Display for ColumnTypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTypeFamily::Int => f.write_str("int"),
            ColumnTypeFamily::BigInt => f.write_str("bigint"),
            ColumnTypeFamily::Float => f.write_str("float"),
            ColumnTypeFamily::Double => f.write_str("double"),
            ColumnTypeFamily::Decimal => f.write_str("decimal"),
            ColumnTypeFamily::Boolean => f.write_str("boolean"),
            ColumnTypeFamily::String => f.write_str("string"),
            ColumnTypeFamily::Binary => f.write_str("binary"),
            ColumnTypeFamily::Date => f.write_str("date"),
            ColumnTypeFamily::Time => f.write_str("time"),
            ColumnTypeFamily::DateTime => f.write_str("datetime"),
            ColumnTypeFamily::Json => f.write_str("json"),
            ColumnTypeFamily::Uuid => f.write_str("uuid"),
            ColumnTypeFamily::Enum(name) => write!(f, "enum({name})"),
            ColumnTypeFamily::Unsupported(name) => write!(f, "unsupported({name})"),
        }
    }
}

/// A column or parameter type as reported by the database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// The full native type name, drawn directly from the database
    /// (`int4`, `varchar(10)`, `bigint unsigned`, …).
    pub full_data_type: String,
    /// The family of the native type.
    pub family: ColumnTypeFamily,
    /// Whether the type is an array of the family (PostgreSQL only).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_list: bool,
}

impl ColumnType {
    pub fn pure(family: ColumnTypeFamily) -> Self {
        ColumnType {
            full_data_type: String::new(),
            family,
            is_list: false,
        }
    }

    pub fn with_full_data_type(family: ColumnTypeFamily, full_data_type: impl Into<String>) -> Self {
        ColumnType {
            full_data_type: full_data_type.into(),
            family,
            is_list: false,
        }
    }

    /// Marks the type as an array of the family.
    pub fn into_list(mut self) -> Self {
        self.is_list = true;
        self
    }
}

/// What is known about whether a result column can be `NULL`.
///
/// `Unknown` covers everything the database cannot or will not decide
/// statically: expressions, outer join sides without protocol support,
/// dynamically typed backends. Consumers must treat `Unknown` as nullable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NonNull,
    Nullable,
    Unknown,
}

impl Nullability {
    /// Definite nullability from a backend that reports it.
    pub fn known(nullable: bool) -> Self {
        if nullable { Nullability::Nullable } else { Nullability::NonNull }
    }

    /// `None` when the database could not decide.
    pub fn is_nullable(self) -> Option<bool> {
        match self {
            Nullability::NonNull => Some(false),
            Nullability::Nullable => Some(true),
            Nullability::Unknown => None,
        }
    }
}

/// One result column of a described query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DescribedColumn {
    /// The column name or alias. Empty when the backend reports none.
    pub name: String,
    /// The column type.
    pub tpe: ColumnType,
    /// Whether the column can be `NULL`.
    pub nullability: Nullability,
}

impl DescribedColumn {
    pub fn new(name: impl Into<String>, tpe: ColumnType, nullability: Nullability) -> Self {
        DescribedColumn {
            name: name.into(),
            tpe,
            nullability,
        }
    }
}

/// One bind parameter of a described query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DescribedParameter {
    /// The parameter name, for backends with named parameters (`@stock` on
    /// SQL Server). Positional backends report `None`.
    pub name: Option<String>,
    /// The inferred parameter type. `None` when the backend reports nothing
    /// usable (MySQL and SQLite placeholders are untyped on the wire).
    pub tpe: Option<ColumnType>,
}

impl DescribedParameter {
    /// A positional parameter with a server-inferred type.
    pub fn typed(tpe: ColumnType) -> Self {
        DescribedParameter { name: None, tpe: Some(tpe) }
    }

    /// A positional parameter the backend reports nothing about.
    pub fn untyped() -> Self {
        DescribedParameter { name: None, tpe: None }
    }

    /// A named, typed parameter.
    pub fn named(name: impl Into<String>, tpe: ColumnType) -> Self {
        DescribedParameter {
            name: Some(name.into()),
            tpe: Some(tpe),
        }
    }
}

/// Everything a describe operation reports about one query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryDescription {
    pub parameters: Vec<DescribedParameter>,
    pub columns: Vec<DescribedColumn>,
}

impl QueryDescription {
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Applies the trailing `!` / `?` nullability markers on column aliases.
    ///
    /// Exactly one trailing marker is consumed per column: the marker is
    /// stripped from the name and the nullability is forced accordingly. The
    /// resolver calls this exactly once per resolution, on the live or the
    /// cached description.
    pub fn apply_column_overrides(&mut self) {
        for column in &mut self.columns {
            let (base, overridden) = parse_column_override(&column.name);

            if let Some(forced) = overridden {
                column.name = base.to_owned();
                column.nullability = match forced {
                    NullabilityOverride::NonNull => Nullability::NonNull,
                    NullabilityOverride::Nullable => Nullability::Nullable,
                };
            }
        }
    }
}

/// A complete metadata record for one query, as stored in the offline cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryMetadata {
    /// The family of the database the query was described against.
    pub family: SqlFamily,
    /// The exact query text. The byte-exact text is the cache identity.
    pub query: String,
    /// The raw description, before any column overrides are applied.
    pub description: QueryDescription,
}
