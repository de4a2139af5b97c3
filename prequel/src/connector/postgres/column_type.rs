use postgres_types::{Kind, Type};
use query_metadata::{ColumnType, ColumnTypeFamily};

/// Maps a wire protocol type to the metadata model.
///
/// Arrays map to the element type with the list marker set. The native name
/// is the PostgreSQL internal name (`int4`, `timestamptz`), exactly as the
/// catalog spells it.
pub(crate) fn column_type(ty: &Type) -> ColumnType {
    match ty.kind() {
        Kind::Array(element) => scalar_type(element).into_list(),
        _ => scalar_type(ty),
    }
}

fn scalar_type(ty: &Type) -> ColumnType {
    let family = match ty.name() {
        "int2" | "int4" => ColumnTypeFamily::Int,
        "int8" | "oid" => ColumnTypeFamily::BigInt,
        "float4" => ColumnTypeFamily::Float,
        "float8" => ColumnTypeFamily::Double,
        "numeric" | "money" => ColumnTypeFamily::Decimal,
        "bool" => ColumnTypeFamily::Boolean,
        "text" | "varchar" | "bpchar" | "char" | "name" | "citext" | "xml" | "inet" | "cidr" | "bit" | "varbit" => {
            ColumnTypeFamily::String
        }
        "bytea" => ColumnTypeFamily::Binary,
        "date" => ColumnTypeFamily::Date,
        "time" | "timetz" => ColumnTypeFamily::Time,
        "timestamp" | "timestamptz" => ColumnTypeFamily::DateTime,
        "json" | "jsonb" => ColumnTypeFamily::Json,
        "uuid" => ColumnTypeFamily::Uuid,
        name => match ty.kind() {
            Kind::Enum(_) => ColumnTypeFamily::Enum(name.to_owned()),
            _ => ColumnTypeFamily::Unsupported(name.to_owned()),
        },
    };

    ColumnType::with_full_data_type(family, ty.name())
}
