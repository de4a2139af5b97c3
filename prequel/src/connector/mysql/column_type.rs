use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType as NativeType},
};
use query_metadata::{ColumnType, ColumnTypeFamily};

/// The character set id the protocol uses to mark binary string data.
const BINARY_CHARSET: u16 = 63;

/// Maps protocol column metadata to the metadata model.
///
/// MySQL reports the text and binary variants of a string type as the same
/// protocol type, split only by the binary character set. Enums arrive as
/// strings with a flag set; the protocol does not carry the enum's name.
pub(crate) fn column_type(column: &Column) -> ColumnType {
    map_column_type(
        column.column_type(),
        column.flags(),
        column.character_set(),
        column.column_length(),
    )
}

fn map_column_type(tpe: NativeType, flags: ColumnFlags, character_set: u16, column_length: u32) -> ColumnType {
    let unsigned = flags.contains(ColumnFlags::UNSIGNED_FLAG);
    let binary = character_set == BINARY_CHARSET;

    if flags.contains(ColumnFlags::ENUM_FLAG) || tpe == NativeType::MYSQL_TYPE_ENUM {
        return ColumnType::with_full_data_type(ColumnTypeFamily::Enum(String::new()), "enum");
    }

    if flags.contains(ColumnFlags::SET_FLAG) || tpe == NativeType::MYSQL_TYPE_SET {
        return ColumnType::with_full_data_type(ColumnTypeFamily::String, "set");
    }

    let (family, native) = match tpe {
        // The canonical boolean type is an alias for tinyint(1).
        NativeType::MYSQL_TYPE_TINY if column_length == 1 => (ColumnTypeFamily::Boolean, "tinyint"),
        NativeType::MYSQL_TYPE_TINY if unsigned => (ColumnTypeFamily::Int, "tinyint unsigned"),
        NativeType::MYSQL_TYPE_TINY => (ColumnTypeFamily::Int, "tinyint"),
        NativeType::MYSQL_TYPE_SHORT if unsigned => (ColumnTypeFamily::Int, "smallint unsigned"),
        NativeType::MYSQL_TYPE_SHORT => (ColumnTypeFamily::Int, "smallint"),
        NativeType::MYSQL_TYPE_INT24 if unsigned => (ColumnTypeFamily::Int, "mediumint unsigned"),
        NativeType::MYSQL_TYPE_INT24 => (ColumnTypeFamily::Int, "mediumint"),
        // An unsigned int does not fit in an i32.
        NativeType::MYSQL_TYPE_LONG if unsigned => (ColumnTypeFamily::BigInt, "int unsigned"),
        NativeType::MYSQL_TYPE_LONG => (ColumnTypeFamily::Int, "int"),
        // An unsigned bigint does not fit in an i64.
        NativeType::MYSQL_TYPE_LONGLONG if unsigned => (ColumnTypeFamily::Decimal, "bigint unsigned"),
        NativeType::MYSQL_TYPE_LONGLONG => (ColumnTypeFamily::BigInt, "bigint"),
        NativeType::MYSQL_TYPE_YEAR => (ColumnTypeFamily::Int, "year"),
        NativeType::MYSQL_TYPE_FLOAT => (ColumnTypeFamily::Float, "float"),
        NativeType::MYSQL_TYPE_DOUBLE => (ColumnTypeFamily::Double, "double"),
        NativeType::MYSQL_TYPE_DECIMAL | NativeType::MYSQL_TYPE_NEWDECIMAL => (ColumnTypeFamily::Decimal, "decimal"),
        NativeType::MYSQL_TYPE_DATE | NativeType::MYSQL_TYPE_NEWDATE => (ColumnTypeFamily::Date, "date"),
        NativeType::MYSQL_TYPE_TIME | NativeType::MYSQL_TYPE_TIME2 => (ColumnTypeFamily::Time, "time"),
        NativeType::MYSQL_TYPE_DATETIME | NativeType::MYSQL_TYPE_DATETIME2 => (ColumnTypeFamily::DateTime, "datetime"),
        NativeType::MYSQL_TYPE_TIMESTAMP | NativeType::MYSQL_TYPE_TIMESTAMP2 => {
            (ColumnTypeFamily::DateTime, "timestamp")
        }
        NativeType::MYSQL_TYPE_JSON => (ColumnTypeFamily::Json, "json"),
        NativeType::MYSQL_TYPE_BIT if column_length == 1 => (ColumnTypeFamily::Boolean, "bit"),
        NativeType::MYSQL_TYPE_BIT => (ColumnTypeFamily::Binary, "bit"),
        NativeType::MYSQL_TYPE_TINY_BLOB if binary => (ColumnTypeFamily::Binary, "tinyblob"),
        NativeType::MYSQL_TYPE_TINY_BLOB => (ColumnTypeFamily::String, "tinytext"),
        NativeType::MYSQL_TYPE_MEDIUM_BLOB if binary => (ColumnTypeFamily::Binary, "mediumblob"),
        NativeType::MYSQL_TYPE_MEDIUM_BLOB => (ColumnTypeFamily::String, "mediumtext"),
        NativeType::MYSQL_TYPE_LONG_BLOB if binary => (ColumnTypeFamily::Binary, "longblob"),
        NativeType::MYSQL_TYPE_LONG_BLOB => (ColumnTypeFamily::String, "longtext"),
        NativeType::MYSQL_TYPE_BLOB if binary => (ColumnTypeFamily::Binary, "blob"),
        NativeType::MYSQL_TYPE_BLOB => (ColumnTypeFamily::String, "text"),
        NativeType::MYSQL_TYPE_VARCHAR | NativeType::MYSQL_TYPE_VAR_STRING if binary => {
            (ColumnTypeFamily::Binary, "varbinary")
        }
        NativeType::MYSQL_TYPE_VARCHAR | NativeType::MYSQL_TYPE_VAR_STRING => (ColumnTypeFamily::String, "varchar"),
        NativeType::MYSQL_TYPE_STRING if binary => (ColumnTypeFamily::Binary, "binary"),
        NativeType::MYSQL_TYPE_STRING => (ColumnTypeFamily::String, "char"),
        NativeType::MYSQL_TYPE_GEOMETRY => {
            return ColumnType::with_full_data_type(
                ColumnTypeFamily::Unsupported("geometry".to_owned()),
                "geometry",
            );
        }
        other => {
            let name = format!("{other:?}")
                .trim_start_matches("MYSQL_TYPE_")
                .to_ascii_lowercase();

            return ColumnType::with_full_data_type(ColumnTypeFamily::Unsupported(name.clone()), name);
        }
    };

    ColumnType::with_full_data_type(family, native)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(tpe: NativeType, flags: ColumnFlags) -> ColumnType {
        map_column_type(tpe, flags, 224, 11)
    }

    #[test]
    fn integer_widths_honor_the_unsigned_flag() {
        assert_eq!(map(NativeType::MYSQL_TYPE_LONG, ColumnFlags::empty()).family, ColumnTypeFamily::Int);
        assert_eq!(
            map(NativeType::MYSQL_TYPE_LONG, ColumnFlags::UNSIGNED_FLAG).family,
            ColumnTypeFamily::BigInt
        );
        assert_eq!(
            map(NativeType::MYSQL_TYPE_LONGLONG, ColumnFlags::empty()).family,
            ColumnTypeFamily::BigInt
        );

        let bigint_unsigned = map(NativeType::MYSQL_TYPE_LONGLONG, ColumnFlags::UNSIGNED_FLAG);
        assert_eq!(bigint_unsigned.family, ColumnTypeFamily::Decimal);
        assert_eq!(bigint_unsigned.full_data_type, "bigint unsigned");
    }

    #[test]
    fn tinyint_of_length_one_is_boolean() {
        let bool_col = map_column_type(NativeType::MYSQL_TYPE_TINY, ColumnFlags::empty(), 224, 1);
        assert_eq!(bool_col.family, ColumnTypeFamily::Boolean);

        let tinyint = map_column_type(NativeType::MYSQL_TYPE_TINY, ColumnFlags::empty(), 224, 4);
        assert_eq!(tinyint.family, ColumnTypeFamily::Int);
    }

    #[test]
    fn string_types_split_on_the_binary_charset() {
        let text = map_column_type(NativeType::MYSQL_TYPE_BLOB, ColumnFlags::empty(), 224, 262140);
        assert_eq!(text.family, ColumnTypeFamily::String);
        assert_eq!(text.full_data_type, "text");

        let blob = map_column_type(NativeType::MYSQL_TYPE_BLOB, ColumnFlags::empty(), 63, 65535);
        assert_eq!(blob.family, ColumnTypeFamily::Binary);
        assert_eq!(blob.full_data_type, "blob");

        let varbinary = map_column_type(NativeType::MYSQL_TYPE_VAR_STRING, ColumnFlags::empty(), 63, 255);
        assert_eq!(varbinary.family, ColumnTypeFamily::Binary);
        assert_eq!(varbinary.full_data_type, "varbinary");
    }

    #[test]
    fn enums_win_over_the_protocol_type() {
        // Enum columns arrive as strings with the flag set.
        let tpe = map(NativeType::MYSQL_TYPE_STRING, ColumnFlags::ENUM_FLAG);

        assert_eq!(tpe.family, ColumnTypeFamily::Enum(String::new()));
        assert_eq!(tpe.full_data_type, "enum");
    }

    #[test]
    fn geometry_is_unsupported() {
        let tpe = map(NativeType::MYSQL_TYPE_GEOMETRY, ColumnFlags::empty());

        assert_eq!(tpe.family, ColumnTypeFamily::Unsupported("geometry".to_owned()));
    }
}
