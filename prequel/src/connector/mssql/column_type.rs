use query_metadata::{ColumnType, ColumnTypeFamily};

/// Maps a system type name reported by `sp_describe_first_result_set` or
/// `sp_describe_undeclared_parameters` to a column type. The server attaches
/// length and precision arguments to the name (`nvarchar(42)`,
/// `decimal(18,2)`), which are stripped before matching.
pub(crate) fn column_type(system_type_name: &str) -> ColumnType {
    let base = match system_type_name.split_once('(') {
        Some((base, _)) => base,
        None => system_type_name,
    };

    let family = match base.to_ascii_lowercase().as_str() {
        "tinyint" | "smallint" | "int" => ColumnTypeFamily::Int,
        "bigint" => ColumnTypeFamily::BigInt,
        // The server normalizes float(1..24) to real, a bare float is always
        // the eight byte kind.
        "real" => ColumnTypeFamily::Float,
        "float" => ColumnTypeFamily::Double,
        "decimal" | "numeric" | "money" | "smallmoney" => ColumnTypeFamily::Decimal,
        "bit" => ColumnTypeFamily::Boolean,
        "char" | "nchar" | "varchar" | "nvarchar" | "text" | "ntext" | "xml" | "sysname" => ColumnTypeFamily::String,
        "binary" | "varbinary" | "image" => ColumnTypeFamily::Binary,
        "date" => ColumnTypeFamily::Date,
        "time" => ColumnTypeFamily::Time,
        "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => ColumnTypeFamily::DateTime,
        "uniqueidentifier" => ColumnTypeFamily::Uuid,
        name => ColumnTypeFamily::Unsupported(name.to_owned()),
    };

    ColumnType::with_full_data_type(family, system_type_name)
}
