use std::sync::Arc;

use strum_macros::Display;
use tracing::{debug, error, info};

use super::error::CalculateError;
use super::operand::OperandEvaluator;
use crate::event::LogEntry;
use crate::parse::ExpressionParser;
use crate::protocol::{CalculateResponse, Metadata};

/// Lifecycle of one `calculate` call. Any failure ends it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Idle,
    Parsing,
    Evaluating,
    Aggregating,
    Responded,
}

/// Root caller: parses, evaluates the root node and summarizes the log.
///
/// The orchestrator never does arithmetic itself. A literal root
/// short-circuits; an operation root is delegated like any other operand.
#[derive(Clone)]
pub struct Orchestrator {
    parser: Arc<dyn ExpressionParser>,
    evaluator: OperandEvaluator,
}

impl Orchestrator {
    pub fn new(parser: Arc<dyn ExpressionParser>, evaluator: OperandEvaluator) -> Self {
        Self { parser, evaluator }
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub async fn calculate(&self, expression: &str) -> Result<CalculateResponse, CalculateError> {
        let mut stage = Stage::Idle;
        let result = self.run(expression, &mut stage).await;
        match &result {
            Ok(response) => info!("{} = {}", expression, response.result),
            Err(err) => error!("calculation failed while {}: {}", stage, err),
        }
        result
    }

    async fn run(
        &self,
        expression: &str,
        stage: &mut Stage,
    ) -> Result<CalculateResponse, CalculateError> {
        *stage = Stage::Parsing;
        let parsed = self.parser.parse(expression).await?;
        debug!("parsed {}", parsed.ast);

        *stage = Stage::Evaluating;
        let evaluation = self.evaluator.evaluate(&parsed.ast).await?;

        *stage = Stage::Aggregating;
        let mut event_log = parsed.event_log;
        event_log.extend(evaluation.event_logs.into_iter().map(LogEntry::from));
        let metadata = Metadata::summarize(&event_log);

        *stage = Stage::Responded;
        Ok(CalculateResponse {
            result: evaluation.value,
            expression: expression.to_string(),
            event_log,
            metadata,
        })
    }
}
