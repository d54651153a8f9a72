use axum::{
    Router,
    http::{Request, StatusCode},
};
use calcmesh_core::{LogEntry, Operator};
use calcmesh_http::{
    handlers::test_helpers::{
        TEST_MAX_EXPRESSION_LENGTH, loopback_gateway, loopback_peer, test_identity, test_parser,
    },
    models::{CalculateResponse, ExecuteResponse, ParseErrorResponse, ParseResponse},
    routes::create_app,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

fn gateway_app() -> Router {
    create_app(loopback_gateway(), test_identity("gateway-service"))
}

fn peer_app(operator: Operator) -> Router {
    create_app(
        loopback_peer(operator),
        test_identity(&calcmesh_core::InstanceIdentity::service_name_for(operator)),
    )
}

fn parser_app() -> Router {
    create_app(test_parser(), test_identity("parser-service"))
}

async fn post(app: Router, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(String::new())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn error_of(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).unwrap();
    value["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_calculate_route() {
    let (status, body) = post(
        gateway_app(),
        "/calculate",
        json!({"expression": "(3 + 5) * (10 - 2)"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: CalculateResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.result, 64.0);
    assert_eq!(response.expression, "(3 + 5) * (10 - 2)");
    assert_eq!(response.event_log.len(), 4);
    assert!(matches!(response.event_log[0], LogEntry::Parse(_)));
    assert_eq!(response.metadata.total_services, 4);

    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert!(raw.get("eventLog").is_some());
    assert!(raw["metadata"].get("totalDuration").is_some());
}

#[tokio::test]
async fn test_calculate_rejects_bad_requests() {
    let (status, body) = post(gateway_app(), "/calculate", json!({}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Missing 'expression' field in request");

    let (status, body) = post(gateway_app(), "/calculate", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Invalid JSON request body");

    let long = vec!["1"; TEST_MAX_EXPRESSION_LENGTH].join("+");
    let (status, _) = post(
        gateway_app(),
        "/calculate",
        json!({ "expression": long }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        gateway_app(),
        "/calculate",
        json!({"expression": "2 * (3 + 4"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "Missing closing parenthesis for '(' at position 4"
    );
}

#[tokio::test]
async fn test_calculate_nested_failure_is_bad_gateway() {
    let (status, body) = post(
        gateway_app(),
        "/calculate",
        json!({"expression": "10 / 0"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(error_of(&body).contains("Division by zero"));
}

#[tokio::test]
async fn test_execute_division_by_zero() {
    let (status, body) = post(
        peer_app(Operator::Divide),
        "/execute",
        json!({"operation": {"operator": "/", "left": 10, "right": 0}}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"error": "Division by zero"}));
}

#[tokio::test]
async fn test_execute_overflow_names_the_cause() {
    let (status, body) = post(
        peer_app(Operator::Multiply),
        "/execute",
        json!({"operation": {"operator": "*", "left": 1e200, "right": 1e200}}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "Result of multiplication is not a finite number"
    );
}

#[tokio::test]
async fn test_execute_operator_mismatch() {
    let (status, body) = post(
        peer_app(Operator::Add),
        "/execute",
        json!({"operation": {"type": "operation", "operator": "%", "left": 1, "right": 2}})
            .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "This service only handles addition (+), got: %"
    );
}

#[tokio::test]
async fn test_execute_delegates_subtrees() {
    let (status, body) = post(
        peer_app(Operator::Add),
        "/execute",
        json!({
            "operation": {
                "type": "operation",
                "operator": "+",
                "left": {"type": "number", "value": 10},
                "right": {
                    "type": "operation",
                    "operator": "*",
                    "left": {"type": "number", "value": 5},
                    "right": {"type": "number", "value": 2}
                }
            }
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: ExecuteResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.result, 20.0);
    assert_eq!(response.event_log.len(), 2);
    assert_eq!(response.event_log[0].service, "multiplication-service");
    let own = &response.event_log[1];
    assert_eq!(own.service, "addition-service");
    assert!(own.delegations.left.is_none());
    assert_eq!(
        own.delegations.right.as_ref().map(|d| d.operation),
        Some(Operator::Multiply)
    );
}

#[tokio::test]
async fn test_execute_missing_operation() {
    let (status, body) = post(peer_app(Operator::Subtract), "/execute", "{}".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Missing 'operation' field");
}

#[tokio::test]
async fn test_parse_route() {
    let (status, body) = post(
        parser_app(),
        "/parse",
        json!({"expression": "10 + 5 * 2"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: ParseResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.ast.operation_count(), 2);
    let LogEntry::Parse(record) = &response.event_log[0] else {
        panic!("expected a parse record");
    };
    assert_eq!(record.result, "AST generated");
    assert_eq!(record.input, "10 + 5 * 2");

    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw["ast"]["type"], "operation");
    assert_eq!(raw["ast"]["operator"], "+");
    assert_eq!(raw["ast"]["right"]["operator"], "*");
}

#[tokio::test]
async fn test_parse_failure_keeps_record() {
    let (status, body) = post(
        parser_app(),
        "/parse",
        json!({"expression": "3 +"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response: ParseErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.error, "Unexpected end of expression");
    let LogEntry::Parse(record) = &response.event_log[0] else {
        panic!("expected a parse record");
    };
    assert_eq!(record.result, "Parse error: Unexpected end of expression");
}

#[tokio::test]
async fn test_probes_and_info() {
    let (status, body) = get(parser_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "service": "parser-service", "hostname": "test-host"})
    );

    let (status, body) = get(peer_app(Operator::Divide), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["service"], "division-service");

    let (status, body) = get(gateway_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "gateway-service");
    assert_eq!(body["endpoints"]["calculate"], "POST /calculate");
    assert_eq!(body["endpoints"]["health"], "GET /health");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = get(gateway_app(), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/calculate").is_some());
    assert!(body["paths"].get("/execute").is_some());
    assert!(body["components"]["schemas"].get("AstNode").is_some());
}

#[tokio::test]
async fn test_role_routes_are_separate() {
    let (status, _) = post(
        parser_app(),
        "/calculate",
        json!({"expression": "1"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
