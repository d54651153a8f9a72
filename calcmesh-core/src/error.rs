use thiserror::Error;

use crate::analyzer::ParseError;
use crate::config::ConfigError;
use crate::eval::{CalculateError, EvalError};
use crate::transport::DelegationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Calculate error: {0}")]
    Calculate(#[from] CalculateError),
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
