//! # calcmesh: Distributed Arithmetic Evaluation
//!
//! calcmesh evaluates arithmetic expressions by parsing them into a tree and
//! handing every operation node to the peer service that owns its operator.
//! Peers delegate subtrees to each other recursively and return an ordered
//! audit trail of every sub-computation.
//!
//! ## Expression Processing Pipeline
//!
//! ```text
//! Expression → Tokenizer → Preprocessor → Analyzer → AST → Orchestrator → Peers
//! ```
//!
//! ### Stage 1: Tokenization
//!
//! The [`tokenizer`] module turns the raw expression into positioned tokens:
//! numbers, operators, parentheses and whitespace.
//!
//! ### Stage 2: Preprocessing
//!
//! The [`preprocessor`] module drops whitespace so the analyzer only sees
//! significant tokens.
//!
//! ### Stage 3: Parsing
//!
//! The [`analyzer`] module builds the [`ast::AstNode`] tree by recursive
//! descent, honoring precedence and parentheses.
//!
//! ### Stage 4: Evaluation
//!
//! The [`eval`] module resolves the tree. The orchestrator delegates the root,
//! each peer's executor resolves its operands (left strictly before right)
//! through the [`transport`] seam and merges the returned audit logs.
//!
//! ## Wire Model
//!
//! [`protocol`] holds the request and response bodies, [`event`] the audit
//! records, [`timestamp`] their time encoding.
//!
//! ## Configuration
//!
//! [`config`] provides the peer address table, instance identity and the
//! JSON-loadable [`config::MeshConfig`].

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod event;
pub mod parse;
pub mod preprocessor;
pub mod protocol;
pub mod timestamp;
pub mod tokenizer;
pub mod transport;

// Re-exports
pub use analyzer::{ParseError, parse};
pub use ast::{AstNode, DecodeError, Operator};
pub use config::{InstanceIdentity, MeshConfig, PeerAddressTable};
pub use error::*;
pub use eval::{
    CalculateError, ErrorCategory, EvalError, EvaluationResult, OperandEvaluator,
    OperationExecutor, Orchestrator,
};
pub use event::{Delegation, Delegations, EventLogEntry, LogEntry, Operands, ParseRecord};
pub use parse::{ExpressionParser, LocalParser, ParseOutcome, RemoteParser};
pub use transport::{DelegationError, HttpTransport, LoopbackTransport, PeerTransport};
