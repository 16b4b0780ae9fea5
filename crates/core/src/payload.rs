use crate::error::FailureKind;
use crate::models::SearchResult;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResultPage {
    pub results: Vec<SearchResult>,
    pub total_results: Option<u64>,
}

/// Decodes a 2xx body. Accepts `{"results": [...]}` and a bare array.
pub(crate) fn parse_body(body: &str) -> Result<ResultPage, FailureKind> {
    let value: Value = serde_json::from_str(body).map_err(|error| {
        warn!(%error, "search response is not valid json");
        FailureKind::MalformedBody
    })?;

    match value {
        Value::Array(items) => Ok(ResultPage {
            results: decode_items(items),
            total_results: None,
        }),
        Value::Object(mut object) => {
            let total_results = object.get("totalResults").and_then(Value::as_u64);
            match object.remove("results") {
                Some(Value::Array(items)) => Ok(ResultPage {
                    results: decode_items(items),
                    total_results,
                }),
                _ => {
                    warn!("search response has no results array");
                    Err(FailureKind::UnexpectedShape)
                }
            }
        }
        other => {
            warn!(kind = value_kind(&other), "search response is not an object");
            Err(FailureKind::UnexpectedShape)
        }
    }
}

fn decode_items(items: Vec<Value>) -> Vec<SearchResult> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(result) => Some(result),
            Err(error) => {
                warn!(position, %error, "dropping search result that cannot be decoded");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
