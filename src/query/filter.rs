//! Record filtering.
//!
//! A [`FilterQuery`] compiles into an ordered list of [`Predicate`]s. Constraints left at their
//! "no constraint" value (empty search, open range, `any_*` sentinel) produce no predicate.

use serde::{Deserialize, Serialize};

use crate::infer::number_or_zero;
use crate::types::Record;

use super::FieldMapping;

pub const ANY_LOCATION: &str = "any_location";
pub const ANY_ROOMS: &str = "any_rooms";
pub const ANY_TYPE: &str = "any_type";
pub const ANY_STATUS: &str = "any_status";

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const OPEN: NumericRange = NumericRange {
        min: 0.0,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// No lower bound above zero and no upper bound.
    pub fn is_open(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for NumericRange {
    fn default() -> Self {
        Self::OPEN
    }
}

/// Filter criteria for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterQuery {
    pub search: String,
    pub price: NumericRange,
    pub area: NumericRange,
    pub location: String,
    pub rooms: String,
    pub unit_type: String,
    pub status: String,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            price: NumericRange::OPEN,
            area: NumericRange::OPEN,
            location: ANY_LOCATION.to_string(),
            rooms: ANY_ROOMS.to_string(),
            unit_type: ANY_TYPE.to_string(),
            status: ANY_STATUS.to_string(),
        }
    }
}

/// One compiled filter step.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Lowercased term must occur in at least one of `fields`.
    Search { term: String, fields: Vec<String> },
    /// Coerced metric must fall inside `range`. `fallback` is read when `field` is not present.
    Range {
        field: String,
        fallback: Option<String>,
        range: NumericRange,
    },
    /// Stringified field must equal `expected`.
    Equals {
        field: String,
        expected: String,
        ignore_case: bool,
    },
}

impl Predicate {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Search { term, fields } => fields.iter().any(|f| {
                record
                    .get(f)
                    .filter(|v| v.is_truthy())
                    .is_some_and(|v| v.to_string().to_lowercase().contains(term.as_str()))
            }),
            Predicate::Range { field, fallback, range } => {
                let value = record
                    .get(field)
                    .filter(|v| v.is_truthy())
                    .or_else(|| fallback.as_deref().and_then(|f| record.get(f)));
                range.contains(number_or_zero(value))
            }
            Predicate::Equals {
                field,
                expected,
                ignore_case,
            } => record.get(field).filter(|v| v.is_truthy()).is_some_and(|v| {
                let actual = v.to_string();
                if *ignore_case {
                    actual.to_lowercase() == *expected
                } else {
                    actual == *expected
                }
            }),
        }
    }
}

/// Compile `query` into predicates, in application order: search, price, location, rooms,
/// unit type, status, area.
pub fn compile(query: &FilterQuery, mapping: &FieldMapping) -> Vec<Predicate> {
    let mut out = Vec::new();

    if !query.search.is_empty() {
        out.push(Predicate::Search {
            term: query.search.to_lowercase(),
            fields: mapping.search_fields.clone(),
        });
    }

    if !query.price.is_open() {
        out.push(Predicate::Range {
            field: mapping.price_field.clone(),
            fallback: mapping.price_fallback_field.clone(),
            range: query.price,
        });
    }

    let categorical = [
        (&query.location, ANY_LOCATION, &mapping.location_field, true),
        (&query.rooms, ANY_ROOMS, &mapping.rooms_field, false),
        (&query.unit_type, ANY_TYPE, &mapping.unit_type_field, true),
        (&query.status, ANY_STATUS, &mapping.status_field, true),
    ];
    for (value, sentinel, field, ignore_case) in categorical {
        if value.is_empty() || value == sentinel {
            continue;
        }
        out.push(Predicate::Equals {
            field: field.clone(),
            expected: if ignore_case { value.to_lowercase() } else { value.clone() },
            ignore_case,
        });
    }

    if !query.area.is_open() {
        out.push(Predicate::Range {
            field: mapping.area_field.clone(),
            fallback: None,
            range: query.area,
        });
    }

    out
}

/// Records matching every predicate of `query`, in input order.
pub fn apply_filters<'a>(records: &'a [Record], query: &FilterQuery, mapping: &FieldMapping) -> Vec<&'a Record> {
    let predicates = compile(query, mapping);
    records
        .iter()
        .filter(|r| predicates.iter().all(|p| p.matches(r)))
        .collect()
}
