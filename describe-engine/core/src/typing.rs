//! Rust type suggestions for described columns and parameters.
//!
//! The names are fully qualified paths into the crates a generated query
//! API is expected to use. The suggestions are strings on purpose, code
//! generators quote them into emitted source.

use query_metadata::{ColumnType, ColumnTypeFamily, DescribedColumn, DescribedParameter, Nullability};

/// The owned Rust type a result column maps to.
///
/// Nullable columns wrap in `Option`, and so do columns with unknown
/// nullability. List types wrap in `Vec` before the `Option`. Returns
/// `None` for types without a mapping.
pub fn rust_type(column: &DescribedColumn) -> Option<String> {
    let base = base_type(&column.tpe)?;

    let full = match column.nullability {
        Nullability::NonNull => base,
        Nullability::Nullable | Nullability::Unknown => format!("Option<{base}>"),
    };

    Some(full)
}

/// The Rust type a bind parameter maps to. `None` when the backend
/// reported no type, or the type has no mapping.
pub fn rust_type_for_parameter(parameter: &DescribedParameter) -> Option<String> {
    parameter.tpe.as_ref().and_then(base_type)
}

fn base_type(tpe: &ColumnType) -> Option<String> {
    let scalar = match &tpe.family {
        ColumnTypeFamily::Int => "i32",
        ColumnTypeFamily::BigInt => "i64",
        ColumnTypeFamily::Float => "f32",
        ColumnTypeFamily::Double => "f64",
        ColumnTypeFamily::Decimal => "bigdecimal::BigDecimal",
        ColumnTypeFamily::Boolean => "bool",
        ColumnTypeFamily::String | ColumnTypeFamily::Enum(_) => "String",
        ColumnTypeFamily::Binary => "Vec<u8>",
        ColumnTypeFamily::Date => "chrono::NaiveDate",
        ColumnTypeFamily::Time => "chrono::NaiveTime",
        ColumnTypeFamily::DateTime => "chrono::DateTime<chrono::Utc>",
        ColumnTypeFamily::Json => "serde_json::Value",
        ColumnTypeFamily::Uuid => "uuid::Uuid",
        ColumnTypeFamily::Unsupported(_) => return None,
    };

    if tpe.is_list {
        Some(format!("Vec<{scalar}>"))
    } else {
        Some(scalar.to_owned())
    }
}
