use query_metadata::{ColumnType, ColumnTypeFamily};

/// Maps a declared column type to the metadata model.
///
/// SQLite columns are dynamically typed; the declared type only pins an
/// affinity. A few non-standard declared names are recognized before the
/// affinity rules since they are what real schemas use for the concepts.
/// Expression columns have no declared type at all and stay unsupported,
/// the override syntax is the escape hatch for those.
pub(crate) fn column_type(decl: Option<&str>) -> ColumnType {
    let decl = match decl {
        Some(decl) => decl,
        None => return ColumnType::pure(ColumnTypeFamily::Unsupported("expression".to_owned())),
    };

    let upper = decl.to_ascii_uppercase();

    let family = match upper.as_str() {
        "BOOLEAN" => ColumnTypeFamily::Boolean,
        "DATE" => ColumnTypeFamily::Date,
        "TIME" => ColumnTypeFamily::Time,
        "DATETIME" => ColumnTypeFamily::DateTime,
        // https://sqlite.org/datatype3.html, section 3.1. An INTEGER column
        // holds 64-bit values.
        upper if upper.contains("INT") => ColumnTypeFamily::BigInt,
        upper if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") => {
            ColumnTypeFamily::String
        }
        upper if upper.contains("BLOB") || upper.is_empty() => ColumnTypeFamily::Binary,
        upper if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") => {
            ColumnTypeFamily::Double
        }
        _ => ColumnTypeFamily::Decimal,
    };

    ColumnType::with_full_data_type(family, decl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_follow_the_affinity_rules() {
        assert_eq!(column_type(Some("INTEGER")).family, ColumnTypeFamily::BigInt);
        assert_eq!(column_type(Some("bigint")).family, ColumnTypeFamily::BigInt);
        assert_eq!(column_type(Some("VARCHAR(255)")).family, ColumnTypeFamily::String);
        assert_eq!(column_type(Some("TEXT")).family, ColumnTypeFamily::String);
        assert_eq!(column_type(Some("BLOB")).family, ColumnTypeFamily::Binary);
        assert_eq!(column_type(Some("DOUBLE PRECISION")).family, ColumnTypeFamily::Double);
        assert_eq!(column_type(Some("float")).family, ColumnTypeFamily::Double);
        assert_eq!(column_type(Some("DECIMAL(10,2)")).family, ColumnTypeFamily::Decimal);
        assert_eq!(column_type(Some("NUMERIC")).family, ColumnTypeFamily::Decimal);
    }

    #[test]
    fn integer_affinity_wins_over_the_others() {
        // Rule one applies before the character rule.
        assert_eq!(column_type(Some("CHARINT")).family, ColumnTypeFamily::BigInt);
    }

    #[test]
    fn non_standard_declared_names_are_recognized() {
        assert_eq!(column_type(Some("BOOLEAN")).family, ColumnTypeFamily::Boolean);
        assert_eq!(column_type(Some("boolean")).family, ColumnTypeFamily::Boolean);
        assert_eq!(column_type(Some("DATE")).family, ColumnTypeFamily::Date);
        assert_eq!(column_type(Some("TIME")).family, ColumnTypeFamily::Time);
        assert_eq!(column_type(Some("DATETIME")).family, ColumnTypeFamily::DateTime);
    }

    #[test]
    fn the_declared_type_is_kept_verbatim() {
        let tpe = column_type(Some("VARCHAR(255)"));

        assert_eq!(tpe.full_data_type, "VARCHAR(255)");
    }

    #[test]
    fn expressions_have_no_declared_type() {
        let tpe = column_type(None);

        assert_eq!(tpe.family, ColumnTypeFamily::Unsupported("expression".to_owned()));
        assert_eq!(tpe.full_data_type, "");
    }
}
