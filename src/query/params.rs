//! Building a query from request parameters.
//!
//! | parameter | effect |
//! |---|---|
//! | `search` | substring match over the search fields |
//! | `minPrice` / `maxPrice` | price range |
//! | `location`, `rooms`, `unitType`, `unitStatus` | categorical equality (`any_*` = none) |
//! | `minArea` / `maxArea` | area range |
//! | `page`, `limit` | 1-based page, page size |
//!
//! A numeric parameter that is missing, unparsable or zero takes its default. Unknown
//! parameters are ignored.

use crate::infer::coerce_number;

use super::filter::{ANY_LOCATION, ANY_ROOMS, ANY_STATUS, ANY_TYPE, FilterQuery, NumericRange};
use super::paginate::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination};

fn number_or(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(coerce_number)
        .filter(|n| *n != 0.0)
        .unwrap_or(default)
}

fn count_or(raw: Option<&str>, default: usize) -> usize {
    let n = number_or(raw, default as f64);
    if n >= 1.0 { n as usize } else { default }
}

fn text_or(raw: Option<&str>, default: &str) -> String {
    match raw {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => default.to_owned(),
    }
}

/// First value wins for repeated keys.
fn lookup<'a, K: AsRef<str>, V: AsRef<str>>(params: &'a [(K, V)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref())
}

impl FilterQuery {
    /// Build filter criteria from decoded query-string pairs.
    pub fn from_params<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> Self {
        let get = |key: &str| lookup(params, key);
        FilterQuery {
            search: get("search").unwrap_or("").to_owned(),
            price: NumericRange::new(
                number_or(get("minPrice"), 0.0),
                number_or(get("maxPrice"), f64::INFINITY),
            ),
            area: NumericRange::new(
                number_or(get("minArea"), 0.0),
                number_or(get("maxArea"), f64::INFINITY),
            ),
            location: text_or(get("location"), ANY_LOCATION),
            rooms: text_or(get("rooms"), ANY_ROOMS),
            unit_type: text_or(get("unitType"), ANY_TYPE),
            status: text_or(get("unitStatus"), ANY_STATUS),
        }
    }
}

impl Pagination {
    /// Read `page` and `limit` from decoded query-string pairs.
    pub fn from_params<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> Self {
        Pagination::new(
            count_or(lookup(params, "page"), DEFAULT_PAGE),
            count_or(lookup(params, "limit"), DEFAULT_LIMIT),
        )
    }
}
