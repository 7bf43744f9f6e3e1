use serde_json::{Map, Value};

use crate::config::CONFIG;
use crate::error::{FetchError, Result};

/// Key holding the returned-record count, shared by every entity endpoint.
pub const COUNT_KEY: &str = "count";

/// One queryable PatentsView entity. The response body names both its
/// record array and its total-count key after the entity, so the parser
/// reads those names from here instead of hard-coding `patents`.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: String,
    pub records_key: String,
    pub total_key: String,
}

impl Endpoint {
    pub fn patents() -> Endpoint {
        Endpoint::patents_at(&CONFIG.api_base_url)
    }

    /// Patents entity against a custom base URL, e.g. a local stub server.
    pub fn patents_at(base_url: impl Into<String>) -> Endpoint {
        Endpoint::entity(base_url, "patents", "total_patent_count")
    }

    pub fn entity(
        base_url: impl Into<String>,
        records_key: impl Into<String>,
        total_key: impl Into<String>,
    ) -> Endpoint {
        Endpoint {
            base_url: base_url.into(),
            records_key: records_key.into(),
            total_key: total_key.into(),
        }
    }
}

/// One record as returned by the API: field name to scalar or nested array.
pub type Record = Map<String, Value>;

/// A parsed response body. `count` and `total` are carried exactly as the
/// server reported them; no cross-check against `records.len()` is done.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub records: Vec<Record>,
    pub count: u64,
    pub total: u64,
}

impl QueryResult {
    /// Parse a decoded body. The top level must be an object with exactly
    /// three keys: the entity record array, `count`, and the entity total.
    /// Anything else is a contract violation, even under status 200.
    pub fn parse(endpoint: &Endpoint, text: &str) -> Result<QueryResult> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| FetchError::MalformedResponse(format!("body is not valid JSON: {e}")))?;

        let object = value.as_object().ok_or_else(|| {
            FetchError::MalformedResponse("top level is not a JSON object".to_string())
        })?;

        if object.len() != 3 {
            let keys = object.keys().cloned().collect::<Vec<_>>().join(", ");
            return Err(FetchError::MalformedResponse(format!(
                "expected exactly 3 top-level keys ({}, {COUNT_KEY}, {}), got: {keys}",
                endpoint.records_key, endpoint.total_key
            )));
        }

        let records = object
            .get(&endpoint.records_key)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FetchError::MalformedResponse(format!(
                    "missing record array under key `{}`",
                    endpoint.records_key
                ))
            })?;

        let records = records
            .iter()
            .map(|record| {
                record.as_object().cloned().ok_or_else(|| {
                    FetchError::MalformedResponse(format!(
                        "`{}` holds a non-object element",
                        endpoint.records_key
                    ))
                })
            })
            .collect::<Result<Vec<Record>>>()?;

        let count = object.get(COUNT_KEY).and_then(Value::as_u64).ok_or_else(|| {
            FetchError::MalformedResponse(format!("missing integer `{COUNT_KEY}`"))
        })?;

        let total = object
            .get(&endpoint.total_key)
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                FetchError::MalformedResponse(format!(
                    "missing integer `{}`",
                    endpoint.total_key
                ))
            })?;

        Ok(QueryResult {
            records,
            count,
            total,
        })
    }
}
