//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowline crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowline::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow = UiFlow::from_json(&std::fs::read_to_string("path/to/flow.json")?)?.into_flow()?;
//! let stages = StageSnapshot::from_file("path/to/stages.json")?;
//!
//! let verdict = validate_execution_path(&flow);
//! println!("{}", PlanFormatter::describe_validation(&verdict));
//!
//! let plan = stages.compiler().compile_flow(&flow);
//! println!("{}", PlanFormatter::render_plan(&plan.operations));
//! # Ok(())
//! # }
//! ```

// Core validation and compilation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::validation::{
    InvalidReason, PathValidator, ValidationResult, validate_execution_path,
};

// Graph model
pub use crate::flow::{
    CompiledFlow, FlowDefinition, FlowEdgeDefinition, FlowNodeDefinition, IntoFlow, NodeKind,
    NodePosition,
};
pub use crate::graph::{AdjacencyIndex, nodes_in_edge_order};
pub use crate::ui::UiFlow;

// Stage configuration
pub use crate::data::StageSnapshot;
pub use crate::operation::{
    CompiledOperation, FilterLogic, FilterMode, FilterParams, RawStageConfig, RenameParams,
    SelectParams, StageParameters, StrParams,
};
pub use crate::registry::{
    ConfigurationResolver, FilterRegistry, FnResolver, RenameRegistry, SelectRegistry,
    StageRecord, StageRegistry, StrRegistry,
};

// Engine boundary
pub use crate::backend::{EngineOperation, EngineRequest, EngineResponse, ExecutionEngine, FlowRunner};

// Error types
pub use crate::error::{ArtifactError, EngineError, FlowConversionError, ParameterError, RunError};

// Plan formatting
pub use crate::trace::PlanFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
