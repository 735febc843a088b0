//! Filtered, faceted, paginated queries over an in-memory record collection.
//!
//! The collection is supplied per request (directly, or loaded from a
//! [`crate::store::RecordStore`]); nothing is cached between queries.
//!
//! Pipeline: [`filter::apply_filters`] → [`paginate::paginate`], with
//! [`facets::extract_filter_options`] computed independently over the unfiltered input.
//!
//! ```rust
//! use unit_ledger::query::{run_query, FieldMapping, FilterQuery, Pagination};
//! use unit_ledger::types::Record;
//!
//! let units = vec![
//!     Record::from_iter([("Unit Name", "Acme"), ("Unit Price", "100")]),
//!     Record::from_iter([("Unit Name", "Beta"), ("Unit Price", "")]),
//! ];
//! let query = FilterQuery { search: "acme".to_string(), ..Default::default() };
//!
//! let resp = run_query(&units, &query, Pagination::default(), &FieldMapping::default());
//! assert_eq!(resp.total, 1);
//! assert_eq!(resp.data[0].get("Unit Name").unwrap().to_string(), "Acme");
//! ```

pub mod facets;
pub mod filter;
pub mod paginate;
pub mod params;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::RecordStore;
use crate::types::Record;

pub use facets::{FilterOptions, distinct_values, extract_filter_options};
pub use filter::{
    ANY_LOCATION, ANY_ROOMS, ANY_STATUS, ANY_TYPE, FilterQuery, NumericRange, Predicate, apply_filters,
};
pub use paginate::{Pagination, paginate};

/// Column keys the query engine reads.
///
/// Defaults match the unit-listing exports this crate is fed. Any field may be overridden,
/// e.g. from a JSON config document:
///
/// ```rust
/// use unit_ledger::query::FieldMapping;
///
/// let m: FieldMapping = serde_json::from_str(r#"{"areaField": "Net Area"}"#).unwrap();
/// assert_eq!(m.area_field, "Net Area");
/// assert_eq!(m.price_field, "Unit Price");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldMapping {
    /// Fields matched by free-text search.
    pub search_fields: Vec<String>,
    pub price_field: String,
    /// Read when `price_field` is absent or empty.
    pub price_fallback_field: Option<String>,
    pub location_field: String,
    pub rooms_field: String,
    pub unit_type_field: String,
    pub status_field: String,
    pub area_field: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            search_fields: vec![
                "Unit Name".to_string(),
                "Phase: Phase Name".to_string(),
                "Unit Type".to_string(),
                "Building Name".to_string(),
            ],
            price_field: "Unit Price".to_string(),
            price_fallback_field: Some("Final Total Unit Price".to_string()),
            location_field: "Phase: Phase Name".to_string(),
            rooms_field: "Number of rooms".to_string(),
            unit_type_field: "Unit Type".to_string(),
            status_field: "Unit Status".to_string(),
            area_field: "Unit Gross Area".to_string(),
        }
    }
}

/// One page of results plus facets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub data: Vec<Record>,
    /// Matching records before pagination.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub filter_options: FilterOptions,
    /// Set when the record collection could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// A well-formed empty response carrying `error`.
    pub fn failed(pagination: Pagination, error: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: pagination.page(),
            limit: pagination.limit(),
            filter_options: FilterOptions::default(),
            error: Some(error.into()),
        }
    }
}

/// Filter, facet and paginate `records`.
pub fn run_query(
    records: &[Record],
    query: &FilterQuery,
    pagination: Pagination,
    mapping: &FieldMapping,
) -> QueryResponse {
    let filtered = apply_filters(records, query, mapping);
    let total = filtered.len();
    let data = paginate(&filtered, pagination).into_iter().cloned().collect();
    let filter_options = extract_filter_options(records, mapping);

    debug!(
        records = records.len(),
        total,
        page = pagination.page(),
        limit = pagination.limit(),
        "query complete"
    );

    QueryResponse {
        data,
        total,
        page: pagination.page(),
        limit: pagination.limit(),
        filter_options,
        error: None,
    }
}

/// Load the collection from `store` and run the query.
///
/// A store that cannot be read yields an empty response with `error` set, never a failure.
pub fn query_store(
    store: &dyn RecordStore,
    query: &FilterQuery,
    pagination: Pagination,
    mapping: &FieldMapping,
) -> QueryResponse {
    match store.load() {
        Ok(records) => run_query(&records, query, pagination, mapping),
        Err(e) => {
            warn!(error = %e, "record store unavailable");
            QueryResponse::failed(pagination, format!("could not read record store: {e}"))
        }
    }
}
