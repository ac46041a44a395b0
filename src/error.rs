use thiserror::Error;

/// Errors raised when a raw stage configuration is turned into typed parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Stage configuration is missing its node id")]
    MissingNodeId,

    #[error("Stage configuration for node '{node_id}' is missing required field '{field}'")]
    MissingField { node_id: String, field: &'static str },

    #[error("Node '{node_id}' uses unknown filter mode '{mode}'")]
    UnknownFilterMode { node_id: String, mode: String },

    #[error("Node '{node_id}' uses unknown filter logic '{logic}', expected 'and' or 'or'")]
    UnknownFilterLogic { node_id: String, logic: String },

    #[error("Filter value '{value}' on node '{node_id}' is not a valid number")]
    InvalidNumber { node_id: String, value: String },

    #[error(
        "Between filter on node '{node_id}' needs two distinct bounds separated by '|', got '{value}'"
    )]
    InvalidBetween { node_id: String, value: String },
}

/// Errors that can occur when converting an editor document into a `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Failed to parse flow document: {0}")]
    JsonParseError(String),

    #[error("Invalid flow document: {0}")]
    ValidationError(String),
}

/// Errors from saving or loading a compiled flow, or loading a stage snapshot.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

/// Errors reported by an execution engine.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Engine request could not be encoded: {0}")]
    Request(String),

    #[error("Engine rejected the pipeline: {0}")]
    Rejected(String),

    #[error("Engine failed: {0}")]
    Failed(String),
}

/// Errors from running a flow end to end.
#[derive(Error, Debug, Clone)]
pub enum RunError {
    #[error("Flow is not runnable: {reason}")]
    InvalidFlow {
        reason: crate::validation::InvalidReason,
    },

    #[error("Flow compiled to an empty pipeline; configure at least one stage")]
    EmptyPipeline,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
