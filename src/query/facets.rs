//! Facet extraction: the distinct values each categorical column takes.
//!
//! Facets are computed over the full, unfiltered collection so a UI can offer every choice even
//! after the result set has been narrowed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Record;

use super::FieldMapping;

/// Distinct values per categorical column, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub room_options: Vec<String>,
    pub unit_types: Vec<String>,
    pub status_options: Vec<String>,
}

/// Stringified, present values of `field`, deduplicated, first occurrence wins.
pub fn distinct_values(records: &[Record], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.get(field))
        .filter(|v| v.is_truthy())
        .map(|v| v.to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

pub fn extract_filter_options(records: &[Record], mapping: &FieldMapping) -> FilterOptions {
    FilterOptions {
        locations: distinct_values(records, &mapping.location_field),
        room_options: distinct_values(records, &mapping.rooms_field),
        unit_types: distinct_values(records, &mapping.unit_type_field),
        status_options: distinct_values(records, &mapping.status_field),
    }
}
