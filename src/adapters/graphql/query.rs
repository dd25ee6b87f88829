//! GraphQL request envelopes and response extraction

use crate::domain::{GraphQlError, Result};
use serde::Serialize;
use serde_json::Value;

/// Operation name sent with every request
pub const OPERATION_NAME: &str = "MyQuery";

/// Root field of the count query
pub const COUNT_FIELD: &str = "countHostVulnerability";

/// Root field of the paged list query
pub const LIST_FIELD: &str = "listHostVulnerability";

const HOST_VULNERABILITY_SELECTION: &str = "lastFound \
     targets { name domains ipAddresses operatingSystem dnsName fqdn netbiosName } \
     definition { qid cves { uid } exportableSolution name } \
     exportableOutput internetFacing riskRating ageInDays complianceStatus dueDate \
     firstFound timesFound lastFixed disposition primaryConsolidationKey type status";

/// Body of a GraphQL POST
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,

    /// Always serialized, as `null` when absent
    pub variables: Option<Value>,

    #[serde(rename = "operationName")]
    pub operation_name: String,
}

impl GraphQlRequest {
    pub fn new(query: String) -> Self {
        Self {
            query,
            variables: None,
            operation_name: OPERATION_NAME.to_string(),
        }
    }
}

/// `countHostVulnerability(filter: "...")`
pub fn count_query(filter: &str) -> GraphQlRequest {
    GraphQlRequest::new(format!(
        "query {OPERATION_NAME} {{ {COUNT_FIELD}(filter: \"{filter}\") }}"
    ))
}

/// `listHostVulnerability(filter, limit, offset)` with the export selection set
pub fn list_query(filter: &str, limit: u64, offset: u64) -> GraphQlRequest {
    GraphQlRequest::new(format!(
        "query {OPERATION_NAME} {{ {LIST_FIELD}(filter: \"{filter}\", limit: {limit}, offset: {offset}) \
         {{ {HOST_VULNERABILITY_SELECTION} }} }}"
    ))
}

/// Joined messages of a non-empty `errors` array
fn error_messages(body: &Value) -> Option<String> {
    let errors = body.get("errors").and_then(Value::as_array)?;
    if errors.is_empty() {
        return None;
    }

    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
        .collect();
    Some(messages.join("; "))
}

/// Fail when the body carries a non-empty `errors` array
fn check_errors(body: &Value) -> Result<()> {
    match error_messages(body) {
        Some(messages) => Err(GraphQlError::QueryFailed(messages).into()),
        None => Ok(()),
    }
}

/// Read `data.countHostVulnerability`
///
/// Counts may arrive as integers or numeric strings.
pub fn extract_count(body: &Value) -> Result<u64> {
    check_errors(body)?;

    let count = body
        .get("data")
        .and_then(|data| data.get(COUNT_FIELD))
        .ok_or_else(|| GraphQlError::InvalidResponse(format!("missing data.{COUNT_FIELD}")))?;

    match count {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        GraphQlError::InvalidResponse(format!("{COUNT_FIELD} is not a count: {count}")).into()
    })
}

/// Records of a list response
///
/// Reads `data.listHostVulnerability`. A partial response (records plus an
/// `errors` array) keeps the records. Without the list field, `errors` fail
/// the request; otherwise the first array found in a depth-first walk of
/// `data` is used.
pub fn extract_records(mut body: Value) -> Result<Vec<Value>> {
    let errors = error_messages(&body);

    if let Some(Value::Array(records)) = body
        .get_mut("data")
        .and_then(|data| data.get_mut(LIST_FIELD))
    {
        if let Some(messages) = &errors {
            tracing::warn!(
                errors = %messages,
                records = records.len(),
                "Partial GraphQL response, keeping returned records"
            );
        }
        return Ok(std::mem::take(records));
    }

    if let Some(messages) = errors {
        return Err(GraphQlError::QueryFailed(messages).into());
    }

    let search_root = body.get("data").unwrap_or(&body);
    match first_array(search_root) {
        Some(records) => {
            tracing::warn!(
                field = LIST_FIELD,
                records = records.len(),
                "List field missing from response, using first array found"
            );
            Ok(records.clone())
        }
        None => Err(GraphQlError::InvalidResponse("response contains no record list".to_string()).into()),
    }
}

/// First array reached by a depth-first walk, in the response's key order
pub fn first_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(first_array),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_serialization() {
        let request = count_query("status = Active");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["operationName"], "MyQuery");
        assert!(body["variables"].is_null());
        assert!(body.as_object().unwrap().contains_key("variables"));
        assert_eq!(
            body["query"],
            "query MyQuery { countHostVulnerability(filter: \"status = Active\") }"
        );
    }

    #[test]
    fn test_list_query_arguments() {
        let request = list_query("status = Active", 5000, 10000);
        assert!(request
            .query
            .contains("listHostVulnerability(filter: \"status = Active\", limit: 5000, offset: 10000)"));
        assert!(request.query.contains("cves { uid }"));
        assert!(request.query.contains("primaryConsolidationKey"));
    }

    #[test]
    fn test_extract_count() {
        assert_eq!(
            extract_count(&json!({"data": {"countHostVulnerability": 12000}})).unwrap(),
            12000
        );
        assert_eq!(
            extract_count(&json!({"data": {"countHostVulnerability": "42"}})).unwrap(),
            42
        );
        assert!(extract_count(&json!({"data": {}})).is_err());
        assert!(extract_count(&json!({"data": {"countHostVulnerability": -1}})).is_err());
    }

    #[test]
    fn test_errors_without_records_fail_extraction() {
        let body = json!({
            "data": {"listHostVulnerability": null},
            "errors": [{"message": "rate limited"}]
        });
        let err = extract_records(body).unwrap_err();
        assert!(err.to_string().contains("rate limited"));

        let body = json!({"data": null, "errors": [{"message": "unauthorized"}]});
        assert!(extract_records(body).unwrap_err().to_string().contains("unauthorized"));

        let body = json!({"data": {"listHostVulnerability": [{"a": 1}]}, "errors": []});
        assert_eq!(extract_records(body).unwrap().len(), 1);
    }

    #[test]
    fn test_partial_response_keeps_records() {
        let body: Value = serde_json::from_str(
            r#"{
                "data": {"listHostVulnerability": [{"primaryConsolidationKey": "k1"}]},
                "errors": [{"message": "field dueDate failed for one record"}]
            }"#,
        )
        .unwrap();

        let records = extract_records(body).unwrap();
        assert_eq!(records, vec![json!({"primaryConsolidationKey": "k1"})]);
    }

    #[test]
    fn test_extract_records_prefers_named_field() {
        let body = json!({
            "data": {
                "other": [1, 2, 3],
                "listHostVulnerability": [{"status": "Active"}]
            }
        });
        let records = extract_records(body).unwrap();
        assert_eq!(records, vec![json!({"status": "Active"})]);
    }

    #[test]
    fn test_extract_records_falls_back_to_first_array() {
        let body = json!({"data": {"renamed": {"items": [{"x": 1}, {"x": 2}]}}});
        assert_eq!(extract_records(body).unwrap().len(), 2);

        assert!(extract_records(json!({"data": {"n": 1}})).is_err());
    }

    #[test]
    fn test_fallback_follows_response_key_order() {
        let body: Value = serde_json::from_str(
            r#"{"data": {"renamed": {"zrecords": [{"x": 1}, {"x": 2}], "aggs": []}}}"#,
        )
        .unwrap();
        assert_eq!(extract_records(body).unwrap().len(), 2);
    }

    #[test]
    fn test_fallback_ignores_top_level_errors_array() {
        let body: Value =
            serde_json::from_str(r#"{"errors": [], "data": {"renamed": [{"x": 1}]}}"#).unwrap();
        assert_eq!(extract_records(body).unwrap(), vec![json!({"x": 1})]);
    }
}
