//! Dotted-path resolution over parsed TOML values.

use crate::ConfigError;
use toml::{Table, Value};

/// Walk `path` segment by segment, descending into tables by key and into
/// arrays by numeric index.
pub(super) fn resolve<'a>(root: &'a Table, path: &str) -> Result<&'a Value, ConfigError> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = root
        .get(first)
        .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    for segment in segments {
        current =
            step(current, segment).ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    }
    Ok(current)
}

/// Descend one level, or `None` when the segment does not address anything.
fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Table(table) => table.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::ConfigError;
    use pretty_assertions::assert_eq;
    use toml::{Table, Value};

    fn sample() -> Table {
        toml::from_str(
            r#"
            [outer.inner]
            leaf = "value"

            [[items]]
            id = 7
            "#,
        )
        .expect("toml")
    }

    #[test]
    fn resolves_nested_tables_and_arrays() {
        let table = sample();
        assert_eq!(
            resolve(&table, "outer.inner.leaf").expect("leaf"),
            &Value::String("value".to_string())
        );
        assert_eq!(
            resolve(&table, "items.0.id").expect("id"),
            &Value::Integer(7)
        );
    }

    #[test]
    fn reports_full_path_on_missing_segment() {
        let table = sample();
        let err = resolve(&table, "outer.absent.leaf").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "outer.absent.leaf"));
    }

    #[test]
    fn rejects_non_numeric_array_index_and_scalar_descent() {
        let table = sample();
        assert!(resolve(&table, "items.first").is_err());
        assert!(resolve(&table, "outer.inner.leaf.deeper").is_err());
        assert!(resolve(&table, "items.3").is_err());
    }
}
