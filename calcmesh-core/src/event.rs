//! Audit trail records.
//!
//! Every evaluated operation node leaves one [`EventLogEntry`]; the parse step
//! leaves one [`ParseRecord`]. A merged log handed to clients is a sequence of
//! [`LogEntry`], which is either of the two.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ast::Operator;
use crate::config::InstanceIdentity;
use crate::timestamp::Timestamp;

/// Identity of the peer a subtree was delegated to and what it returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Delegation {
    pub service: String,
    pub hostname: String,
    pub operation: Operator,
    pub result: f64,
}

impl Delegation {
    pub const UNKNOWN_SERVICE: &'static str = "unknown-service";
    pub const UNKNOWN_HOSTNAME: &'static str = "unknown-hostname";

    /// Builds the record for a delegated subtree from the peer's returned log.
    ///
    /// The last entry of that log is the peer's own entry. An empty log yields
    /// placeholder identity.
    pub fn from_peer_log(operation: Operator, result: f64, log: &[EventLogEntry]) -> Self {
        let (service, hostname) = match log.last() {
            Some(entry) => (entry.service.clone(), entry.hostname.clone()),
            None => (
                Self::UNKNOWN_SERVICE.to_string(),
                Self::UNKNOWN_HOSTNAME.to_string(),
            ),
        };
        Self {
            service,
            hostname,
            operation,
            result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Operands {
    pub left: f64,
    pub right: f64,
}

/// `left`/`right` are set exactly when that operand was an operation node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Delegations {
    pub left: Option<Delegation>,
    pub right: Option<Delegation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventLogEntry {
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
    pub hostname: String,
    pub service: String,
    pub operation: Operator,
    pub operands: Operands,
    pub result: f64,
    pub delegations: Delegations,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
}

/// Record of a single parse step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParseRecord {
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
    pub hostname: String,
    pub service: String,
    pub operation: String,
    pub input: String,
    pub result: String,
    #[serde(default)]
    pub duration: u64,
}

impl ParseRecord {
    pub const OPERATION: &'static str = "parse";
    pub const SUCCESS: &'static str = "AST generated";

    pub fn success(identity: &InstanceIdentity, input: &str, duration: u64) -> Self {
        Self::new(identity, input, Self::SUCCESS.to_string(), duration)
    }

    pub fn failure(identity: &InstanceIdentity, input: &str, message: &str, duration: u64) -> Self {
        Self::new(identity, input, format!("Parse error: {}", message), duration)
    }

    fn new(identity: &InstanceIdentity, input: &str, result: String, duration: u64) -> Self {
        Self {
            timestamp: Timestamp::now(),
            hostname: identity.hostname.clone(),
            service: identity.service.clone(),
            operation: Self::OPERATION.to_string(),
            input: input.to_string(),
            result,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LogEntry {
    Operation(EventLogEntry),
    Parse(ParseRecord),
}

impl LogEntry {
    pub fn service(&self) -> &str {
        match self {
            LogEntry::Operation(entry) => &entry.service,
            LogEntry::Parse(record) => &record.service,
        }
    }

    pub fn duration(&self) -> u64 {
        match self {
            LogEntry::Operation(entry) => entry.duration,
            LogEntry::Parse(record) => record.duration,
        }
    }
}

impl From<EventLogEntry> for LogEntry {
    fn from(entry: EventLogEntry) -> Self {
        LogEntry::Operation(entry)
    }
}

impl From<ParseRecord> for LogEntry {
    fn from(record: ParseRecord) -> Self {
        LogEntry::Parse(record)
    }
}
