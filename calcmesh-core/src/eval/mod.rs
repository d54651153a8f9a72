//! Distributed evaluation of an AST.
//!
//! # Core Components
//!
//! ## Operand Evaluator
//! Turns one operand into a number. Literals resolve in place; operation nodes
//! are sent to the peer owning their operator.
//!
//! ## Operation Executor
//! The `/execute` contract every peer implements for its own operator:
//! validate, resolve left then right, combine, record, merge.
//!
//! ## Orchestrator
//! The root caller behind `/calculate`. Parses, evaluates the root the same
//! way an operand evaluator would and summarizes the merged log.
//!
//! # Audit Log Order
//!
//! A merged log lists the entries of the left subtree, then those of the
//! right subtree, then the entry of the node itself. The orchestrator puts the
//! parse record in front.

pub mod error;
pub mod executor;
pub mod operand;
pub mod orchestrator;

pub use error::{CalculateError, ErrorCategory, EvalError};
pub use executor::{OperationExecutor, ZERO_TOLERANCE, combine};
pub use operand::{EvaluationResult, OperandEvaluator};
pub use orchestrator::{Orchestrator, Stage};
