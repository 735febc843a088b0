//! Header name cleanup shared by the delimited and workbook paths.

use std::collections::HashSet;

/// Name given to a column whose header cell is blank (`idx` is 0-based).
pub fn placeholder_name(idx: usize) -> String {
    format!("Column_{}", idx + 1)
}

/// Strip one pair of matching straight quotes wrapping the whole token.
///
/// At least one character must sit between the quotes, so `""` is left alone.
pub fn strip_wrapping_quotes(token: &str) -> &str {
    for q in ['"', '\''] {
        if token.len() >= 3 && token.starts_with(q) && token.ends_with(q) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

/// Trim, then strip wrapping quotes.
pub fn clean_token(raw: &str) -> &str {
    strip_wrapping_quotes(raw.trim())
}

/// Replace blank names with placeholders and make repeated names unique with `_2`, `_3`, ...
pub fn finalize_headers(names: Vec<String>) -> Vec<String> {
    let names: Vec<String> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| if name.is_empty() { placeholder_name(idx) } else { name })
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{name}_{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
