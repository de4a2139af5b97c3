/// A nullability override carried on a column alias.
///
/// A trailing `!` on an alias forces the column non-null, a trailing `?`
/// forces it nullable. The marker exists for expression columns and outer
/// join sides where the database reports `Unknown` and the caller knows
/// better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullabilityOverride {
    NonNull,
    Nullable,
}

/// Splits a column name into its base name and the override marker, if any.
///
/// Only the last character is inspected, and a name consisting of a bare
/// marker is left alone: `"price!"` is an override, `"!"` is a column named
/// `!`.
pub fn parse_column_override(name: &str) -> (&str, Option<NullabilityOverride>) {
    if name.len() > 1 {
        if let Some(base) = name.strip_suffix('!') {
            return (base, Some(NullabilityOverride::NonNull));
        }

        if let Some(base) = name.strip_suffix('?') {
            return (base, Some(NullabilityOverride::Nullable));
        }
    }

    (name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(parse_column_override("price"), ("price", None));
        assert_eq!(parse_column_override(""), ("", None));
    }

    #[test]
    fn trailing_bang_forces_non_null() {
        assert_eq!(
            parse_column_override("price!"),
            ("price", Some(NullabilityOverride::NonNull))
        );
    }

    #[test]
    fn trailing_question_mark_forces_nullable() {
        assert_eq!(
            parse_column_override("parent_id?"),
            ("parent_id", Some(NullabilityOverride::Nullable))
        );
    }

    #[test]
    fn bare_markers_are_column_names() {
        assert_eq!(parse_column_override("!"), ("!", None));
        assert_eq!(parse_column_override("?"), ("?", None));
    }

    #[test]
    fn only_one_marker_is_consumed() {
        assert_eq!(
            parse_column_override("a!?"),
            ("a!", Some(NullabilityOverride::Nullable))
        );
    }
}
