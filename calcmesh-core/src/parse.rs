//! How the orchestrator reaches a parser: in the same process, or over HTTP
//! at a parser service.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::analyzer::{self, ParseError};
use crate::ast::AstNode;
use crate::config::InstanceIdentity;
use crate::eval::CalculateError;
use crate::event::{LogEntry, ParseRecord};
use crate::protocol::{ParseRequest, ParseResponse};
use crate::transport::{DelegationError, http::{PARSE_PATH, post_json}};

/// A parsed expression and the log of the parse step.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub ast: AstNode,
    pub event_log: Vec<LogEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpressionParser: Send + Sync {
    async fn parse(&self, expression: &str) -> Result<ParseOutcome, CalculateError>;
}

/// Parses in-process and writes the parse record under its own identity.
#[derive(Debug, Clone)]
pub struct LocalParser {
    identity: InstanceIdentity,
}

impl LocalParser {
    pub fn new(identity: InstanceIdentity) -> Self {
        Self { identity }
    }

    /// Parses `input`. The record is produced whether or not parsing succeeds.
    pub fn parse_with_record(&self, input: &str) -> (Result<AstNode, ParseError>, ParseRecord) {
        let started = Instant::now();
        let result = analyzer::parse(input);
        let duration = started.elapsed().as_millis() as u64;

        let record = match &result {
            Ok(_) => ParseRecord::success(&self.identity, input, duration),
            Err(err) => ParseRecord::failure(&self.identity, input, &err.to_string(), duration),
        };
        (result, record)
    }
}

#[async_trait]
impl ExpressionParser for LocalParser {
    async fn parse(&self, expression: &str) -> Result<ParseOutcome, CalculateError> {
        let (result, record) = self.parse_with_record(expression);
        let ast = result?;
        Ok(ParseOutcome {
            ast,
            event_log: vec![record.into()],
        })
    }
}

/// Calls the `/parse` endpoint of a parser service.
#[derive(Debug, Clone)]
pub struct RemoteParser {
    client: reqwest::Client,
    url: String,
}

impl RemoteParser {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), PARSE_PATH),
        }
    }
}

#[async_trait]
impl ExpressionParser for RemoteParser {
    async fn parse(&self, expression: &str) -> Result<ParseOutcome, CalculateError> {
        debug!("remote parse at {}", self.url);
        let request = ParseRequest {
            expression: expression.to_string(),
        };
        match post_json::<_, ParseResponse>(&self.client, &self.url, &request).await {
            Ok(response) => Ok(ParseOutcome {
                ast: response.ast,
                event_log: response.event_log,
            }),
            Err(DelegationError::Status {
                status: 400..=499,
                message,
                ..
            }) => Err(CalculateError::RemoteParse(message)),
            Err(err) => {
                warn!("parser service failed: {}", err);
                Err(CalculateError::ParserUnavailable(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use serde_json::json;

    fn identity() -> InstanceIdentity {
        InstanceIdentity::new("parser-service", "parser-0")
    }

    #[test]
    fn test_record_on_success() {
        let (result, record) = LocalParser::new(identity()).parse_with_record("5 + 3");
        assert_eq!(
            result.unwrap(),
            AstNode::operation(Operator::Add, AstNode::number(5.0), AstNode::number(3.0))
        );
        assert_eq!(record.result, "AST generated");
        assert_eq!(record.input, "5 + 3");
        assert_eq!(record.service, "parser-service");
    }

    #[test]
    fn test_record_on_failure() {
        let (result, record) = LocalParser::new(identity()).parse_with_record("(1 + 2");
        assert!(result.is_err());
        assert_eq!(
            record.result,
            "Parse error: Missing closing parenthesis for '(' at position 0"
        );
    }

    #[tokio::test]
    async fn test_local_parser_seam() {
        let parser = LocalParser::new(identity());
        let outcome = parser.parse("7").await.unwrap();
        assert_eq!(outcome.ast, AstNode::number(7.0));
        assert_eq!(outcome.event_log.len(), 1);

        let err = parser.parse("").await.unwrap_err();
        assert_eq!(err, CalculateError::Parse(ParseError::EmptyExpression));
    }

    #[tokio::test]
    async fn test_remote_parser() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/parse")
            .match_body(mockito::Matcher::Json(json!({"expression": "2 * 3"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "ast": {
                        "type": "operation",
                        "operator": "*",
                        "left": {"type": "number", "value": 2},
                        "right": {"type": "number", "value": 3}
                    },
                    "eventLog": [{
                        "timestamp": "2024-05-01T12:00:00.000Z",
                        "hostname": "parser-0",
                        "service": "parser-service",
                        "operation": "parse",
                        "input": "2 * 3",
                        "result": "AST generated",
                        "duration": 0
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let parser = RemoteParser::new(reqwest::Client::new(), &server.url());
        let outcome = parser.parse("2 * 3").await.unwrap();
        assert_eq!(outcome.ast.operation_count(), 1);
        assert!(matches!(outcome.event_log[0], LogEntry::Parse(_)));
    }

    #[tokio::test]
    async fn test_remote_parser_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/parse")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Empty expression", "eventLog": []}"#)
            .create_async()
            .await;

        let parser = RemoteParser::new(reqwest::Client::new(), &server.url());
        assert_eq!(
            parser.parse("").await.unwrap_err(),
            CalculateError::RemoteParse("Empty expression".to_string())
        );
    }

    #[tokio::test]
    async fn test_remote_parser_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/parse")
            .with_status(503)
            .create_async()
            .await;

        let parser = RemoteParser::new(reqwest::Client::new(), &server.url());
        let err = parser.parse("1").await.unwrap_err();
        assert!(matches!(err, CalculateError::ParserUnavailable(_)));
    }
}
