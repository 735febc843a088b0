//! Column type inference and the single numeric coercion rule shared by ingestion and queries.

use indexmap::IndexMap;

use crate::types::{FieldInfo, FieldType, Record, Value};

/// How [`detect_fields`] derives each column's display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Label is the column name as-is.
    Verbatim,
    /// Label is the column name run through [`humanize_label`].
    Humanized,
}

/// Parse trimmed text as a finite decimal number.
///
/// Empty text, `inf`/`NaN` spellings and anything `f64` parsing rejects yield `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Query-time coercion: numbers pass through, text is coerced, everything else is 0.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) if n.is_finite() => *n,
        Some(Value::Text(s)) => coerce_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Classify one column from the first record holding a non-empty value for it.
///
/// Returns the type and the example value; records are never modified.
pub fn infer_column(records: &[Record], column: &str) -> (FieldType, Value) {
    let first = records
        .iter()
        .filter_map(|r| r.get(column))
        .find(|v| !v.is_empty());

    match first {
        None => (FieldType::String, Value::Null),
        Some(Value::Number(n)) => (FieldType::Number, Value::Number(*n)),
        Some(raw @ Value::Text(s)) => match coerce_number(s) {
            Some(n) => (FieldType::Number, Value::Number(n)),
            None => (FieldType::String, raw.clone()),
        },
        Some(Value::Null) => (FieldType::String, Value::Null),
    }
}

/// Build `detectedFields` for every column in `fields`.
pub fn detect_fields(
    records: &[Record],
    fields: &[String],
    labels: LabelStyle,
) -> IndexMap<String, FieldInfo> {
    fields
        .iter()
        .map(|name| {
            let (field_type, example) = infer_column(records, name);
            let label = match labels {
                LabelStyle::Verbatim => name.clone(),
                LabelStyle::Humanized => humanize_label(name),
            };
            (
                name.clone(),
                FieldInfo {
                    field_type,
                    label,
                    example,
                },
            )
        })
        .collect()
}

/// Turn a column key into a display label.
///
/// A leading `Column_` placeholder prefix becomes `Column `, then each word (split on `_` or
/// whitespace) is capitalized and lowercased after its first character.
pub fn humanize_label(header: &str) -> String {
    let header = match header.strip_prefix("Column_") {
        Some(rest) => format!("Column {rest}"),
        None => header.to_owned(),
    };

    header
        .split(|c: char| c == '_' || c.is_whitespace())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(column: &str, values: &[Value]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::from_iter([(column, v.clone())]))
            .collect()
    }

    #[test]
    fn coerce_number_accepts_decimal_forms_only() {
        assert_eq!(coerce_number(" 100 "), Some(100.0));
        assert_eq!(coerce_number("-2.5"), Some(-2.5));
        assert_eq!(coerce_number("1e3"), Some(1000.0));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("   "), None);
        assert_eq!(coerce_number("12 sqm"), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("inf"), None);
    }

    #[test]
    fn number_or_zero_falls_back_to_zero() {
        assert_eq!(number_or_zero(Some(&Value::text("250000"))), 250000.0);
        assert_eq!(number_or_zero(Some(&Value::Number(7.5))), 7.5);
        assert_eq!(number_or_zero(Some(&Value::text("call us"))), 0.0);
        assert_eq!(number_or_zero(Some(&Value::Null)), 0.0);
        assert_eq!(number_or_zero(None), 0.0);
    }

    #[test]
    fn first_non_empty_value_decides_type() {
        let rs = records("Price", &[Value::text(""), Value::text("100"), Value::text("n/a")]);
        assert_eq!(infer_column(&rs, "Price"), (FieldType::Number, Value::Number(100.0)));

        let rs = records("Price", &[Value::Null, Value::text("n/a"), Value::text("100")]);
        assert_eq!(infer_column(&rs, "Price"), (FieldType::String, Value::text("n/a")));
    }

    #[test]
    fn native_numbers_classify_as_number() {
        let rs = records("Area", &[Value::Number(82.5)]);
        assert_eq!(infer_column(&rs, "Area"), (FieldType::Number, Value::Number(82.5)));
    }

    #[test]
    fn all_empty_column_defaults_to_string_with_null_example() {
        let rs = records("Notes", &[Value::Null, Value::text("")]);
        assert_eq!(infer_column(&rs, "Notes"), (FieldType::String, Value::Null));
        assert_eq!(infer_column(&[], "Notes"), (FieldType::String, Value::Null));
    }

    #[test]
    fn inference_leaves_records_untouched() {
        let rs = records("Price", &[Value::text("100")]);
        let before = rs.clone();
        let fields = detect_fields(&rs, &["Price".to_string()], LabelStyle::Verbatim);
        assert_eq!(rs, before);
        assert_eq!(fields["Price"].example, Value::Number(100.0));
        assert_eq!(fields["Price"].label, "Price");
    }

    #[test]
    fn humanize_rewrites_placeholders_and_capitalizes_words() {
        assert_eq!(humanize_label("Column_3"), "Column 3");
        assert_eq!(humanize_label("unit_gross_area"), "Unit Gross Area");
        assert_eq!(humanize_label("UNIT STATUS"), "Unit Status");
        assert_eq!(humanize_label("Phase: Phase Name"), "Phase: Phase Name");
    }
}
