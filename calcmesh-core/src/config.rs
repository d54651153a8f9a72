use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{InternalResult, ast::Operator};

/// Where each operator's peer service lives. Built once at startup and
/// shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeerAddressTable {
    #[serde(default = "default_addition_url")]
    pub addition: String,
    #[serde(default = "default_subtraction_url")]
    pub subtraction: String,
    #[serde(default = "default_multiplication_url")]
    pub multiplication: String,
    #[serde(default = "default_division_url")]
    pub division: String,
}

impl Default for PeerAddressTable {
    fn default() -> Self {
        Self {
            addition: default_addition_url(),
            subtraction: default_subtraction_url(),
            multiplication: default_multiplication_url(),
            division: default_division_url(),
        }
    }
}

impl PeerAddressTable {
    pub fn address_for(&self, operator: Operator) -> &str {
        match operator {
            Operator::Add => &self.addition,
            Operator::Subtract => &self.subtraction,
            Operator::Multiply => &self.multiplication,
            Operator::Divide => &self.division,
        }
    }

    /// Reverse lookup, used by in-process routing.
    pub fn operator_at(&self, address: &str) -> Option<Operator> {
        use strum::IntoEnumIterator;
        Operator::iter().find(|op| self.address_for(*op) == address)
    }
}

/// Name and host reported in every audit record this instance writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InstanceIdentity {
    pub service: String,
    pub hostname: String,
}

impl InstanceIdentity {
    pub const UNKNOWN_HOSTNAME: &'static str = "unknown";

    pub fn new(service: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            hostname: hostname.into(),
        }
    }

    /// Identity with the OS hostname, or `"unknown"` when it cannot be read.
    pub fn detect(service: impl Into<String>) -> Self {
        Self::new(service, local_hostname())
    }

    /// Conventional service name of the peer owning `operator`.
    pub fn service_name_for(operator: Operator) -> String {
        format!("{}-service", operator.name())
    }
}

pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| InstanceIdentity::UNKNOWN_HOSTNAME.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeshConfig {
    #[serde(default)]
    pub peers: PeerAddressTable,

    #[serde(default = "default_parser_url")]
    pub parser_url: String,

    #[serde(default = "default_request_timeout", with = "duration_ms")]
    #[schema(value_type = u64, pattern = "uint64 as milliseconds")]
    pub request_timeout: Duration,

    #[serde(default = "default_max_expression_length")]
    pub max_expression_length: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            peers: PeerAddressTable::default(),
            parser_url: default_parser_url(),
            request_timeout: default_request_timeout(),
            max_expression_length: default_max_expression_length(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path).map_err(ConfigError::from)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader).map_err(ConfigError::from)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s).map_err(ConfigError::from)?;
    Ok(config)
}

fn default_addition_url() -> String {
    "http://addition-service:8082".to_string()
}
fn default_subtraction_url() -> String {
    "http://subtraction-service:8083".to_string()
}
fn default_multiplication_url() -> String {
    "http://multiplication-service:8084".to_string()
}
fn default_division_url() -> String {
    "http://division-service:8086".to_string()
}
fn default_parser_url() -> String {
    "http://parser-service:8081".to_string()
}
fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}
fn default_max_expression_length() -> usize {
    1000
}

pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
