use crate::compiler::Compiler;
use crate::error::{EngineError, RunError};
use crate::flow::FlowDefinition;
use crate::operation::CompiledOperation;
use crate::validation::PathValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One step as the execution engine receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOperation {
    pub op: String,
    pub parameters: BTreeMap<String, String>,
}

impl From<&CompiledOperation> for EngineOperation {
    fn from(operation: &CompiledOperation) -> Self {
        Self {
            op: operation.op.clone(),
            parameters: operation.parameter_map(),
        }
    }
}

/// A full pipeline run request: the file to process and the steps to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub input_path: String,
    pub operations: Vec<EngineOperation>,
}

impl EngineRequest {
    pub fn new(input_path: impl Into<String>, operations: &[CompiledOperation]) -> Self {
        Self {
            input_path: input_path.into(),
            operations: operations.iter().map(EngineOperation::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::Request(e.to_string()))
    }
}

/// What the engine reports back after a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineResponse {
    pub message: String,
    #[serde(default)]
    pub output_path: Option<String>,
}

/// The external file-processing engine that applies compiled operations.
///
/// Implementations typically forward the request to another process; this
/// crate only defines the call.
pub trait ExecutionEngine {
    fn run(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError>;
}

/// Validates, compiles and dispatches a flow to an engine in one call.
pub struct FlowRunner<'a, E: ExecutionEngine> {
    compiler: &'a Compiler<'a>,
    engine: &'a E,
    validator: PathValidator,
}

impl<'a, E: ExecutionEngine> FlowRunner<'a, E> {
    pub fn new(compiler: &'a Compiler<'a>, engine: &'a E) -> Self {
        Self {
            compiler,
            engine,
            validator: PathValidator::new(),
        }
    }

    pub fn run(
        &self,
        flow: &FlowDefinition,
        input_path: &str,
    ) -> Result<EngineResponse, RunError> {
        let verdict = self.validator.validate(flow);
        if let Some(reason) = verdict.reason {
            return Err(RunError::InvalidFlow { reason });
        }

        let operations = self.compiler.compile(flow);
        if operations.is_empty() {
            return Err(RunError::EmptyPipeline);
        }

        let request = EngineRequest::new(input_path, &operations);
        tracing::debug!(
            input = input_path,
            steps = request.operations.len(),
            "dispatching pipeline to engine"
        );
        Ok(self.engine.run(&request)?)
    }
}
