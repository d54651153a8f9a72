//! Request and response bodies exchanged between gateway, parser and peers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use utoipa::ToSchema;

use crate::ast::AstNode;
use crate::event::{EventLogEntry, LogEntry};

/// Body of `POST /execute` as sent by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExecuteRequest {
    pub operation: AstNode,
}

impl ExecuteRequest {
    pub fn new(operation: AstNode) -> Self {
        Self { operation }
    }
}

/// Body of `POST /execute` as received by a peer.
///
/// Kept loose so that every validation failure gets its own message instead
/// of a generic deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteEnvelope {
    #[serde(default)]
    pub operation: Option<Value>,
}

impl From<ExecuteRequest> for ExecuteEnvelope {
    fn from(request: ExecuteRequest) -> Self {
        Self {
            operation: serde_json::to_value(request.operation).ok(),
        }
    }
}

/// Operation object inside an [`ExecuteEnvelope`], before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationRequest {
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub left: Option<Value>,
    #[serde(default)]
    pub right: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub result: f64,
    pub event_log: Vec<EventLogEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ParseRequest {
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub ast: AstNode,
    pub event_log: Vec<LogEntry>,
}

/// Failed parse; the parse record is still returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseErrorResponse {
    pub error: String,
    #[serde(default)]
    pub event_log: Vec<LogEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CalculateRequest {
    #[serde(default)]
    pub expression: String,
}

impl CalculateRequest {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub result: f64,
    pub expression: String,
    pub event_log: Vec<LogEntry>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_services: usize,
    /// Sum of all entry durations in milliseconds.
    pub total_duration: u64,
}

impl Metadata {
    pub fn summarize(log: &[LogEntry]) -> Self {
        let services: HashSet<&str> = log.iter().map(LogEntry::service).collect();
        Self {
            total_services: services.len(),
            total_duration: log.iter().map(LogEntry::duration).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Decodes a JSON body that may carry an AST of any depth.
///
/// Every operation of a tree is one level of JSON nesting, so the default
/// 128 level limit of serde_json is lifted and the stack grows on demand.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut json = serde_json::Deserializer::from_slice(bytes);
    json.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use crate::config::InstanceIdentity;
    use crate::event::{Delegations, Operands, ParseRecord};
    use crate::timestamp::Timestamp;
    use serde_json::json;

    fn op_entry(service: &str, duration: u64) -> LogEntry {
        LogEntry::Operation(EventLogEntry {
            timestamp: Timestamp::now(),
            hostname: "h".to_string(),
            service: service.to_string(),
            operation: Operator::Add,
            operands: Operands {
                left: 1.0,
                right: 1.0,
            },
            result: 2.0,
            delegations: Delegations::default(),
            duration,
        })
    }

    /// `1 + 1 + ... + 1` with `terms` literals, as the parser's JSON.
    fn left_chain_json(terms: usize) -> String {
        let depth = terms - 1;
        format!(
            "{}1{}",
            r#"{"type":"operation","operator":"+","left":"#.repeat(depth),
            r#","right":{"type":"number","value":1}}"#.repeat(depth)
        )
    }

    #[test]
    fn test_deep_trees_decode() {
        let body = format!(r#"{{"ast":{},"eventLog":[]}}"#, left_chain_json(500));
        assert!(serde_json::from_str::<ParseResponse>(&body).is_err());

        let response: ParseResponse = from_json_slice(body.as_bytes()).unwrap();
        assert_eq!(response.ast.operation_count(), 499);
        assert!(response.event_log.is_empty());

        let request: ExecuteRequest =
            from_json_slice(format!(r#"{{"operation":{}}}"#, left_chain_json(300)).as_bytes())
                .unwrap();
        assert_eq!(request.operation.operation_count(), 299);
    }

    #[test]
    fn test_from_json_slice_rejects_trailing_input() {
        assert!(from_json_slice::<ErrorResponse>(br#"{"error":"x"} {}"#).is_err());
        assert_eq!(
            from_json_slice::<ErrorResponse>(br#"{"error":"x"}"#).unwrap(),
            ErrorResponse::new("x")
        );
    }

    #[test]
    fn test_metadata_counts_distinct_services() {
        let identity = InstanceIdentity::new("parser-service", "p");
        let log = vec![
            ParseRecord::success(&identity, "1 + 1 + 1", 2).into(),
            op_entry("addition-service", 4),
            op_entry("addition-service", 9),
        ];
        assert_eq!(
            Metadata::summarize(&log),
            Metadata {
                total_services: 2,
                total_duration: 15
            }
        );
        assert_eq!(Metadata::summarize(&[]), Metadata::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let response = CalculateResponse {
            result: 8.0,
            expression: "5 + 3".to_string(),
            event_log: vec![],
            metadata: Metadata {
                total_services: 2,
                total_duration: 5,
            },
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["eventLog"], json!([]));
        assert_eq!(
            value["metadata"],
            json!({"totalServices": 2, "totalDuration": 5})
        );
    }

    #[test]
    fn test_envelope_is_lenient() {
        let envelope: ExecuteEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.operation.is_none());

        let request: OperationRequest =
            serde_json::from_value(json!({"operator": "+", "left": 1})).unwrap();
        assert_eq!(request.operator.as_deref(), Some("+"));
        assert!(request.right.is_none());
    }

    #[test]
    fn test_missing_expression_defaults_to_empty() {
        let request: CalculateRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.expression.is_empty());
    }
}
