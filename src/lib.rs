//! # flowline - Flow Graph Validation and Compilation
//!
//! **flowline** turns a user-drawn pipeline graph (start, select, filter,
//! string-op, rename, end, ...) into the ordered list of operations an external
//! tabular-data engine applies to a CSV or Excel file.
//!
//! ## Core Workflow
//!
//! The crate is editor-agnostic. It works on a canonical [`FlowDefinition`](flow::FlowDefinition)
//! and on per-stage configuration registries keyed by node id:
//!
//! 1.  **Load the graph**: deserialize your editor document and convert it with the `IntoFlow` trait
//!     (the bundled `UiFlow` handles the common `{ nodes, edges }` layout).
//! 2.  **Validate**: `PathValidator` checks there is exactly one start node and a reachable leaf, and
//!     returns a reason code the UI can turn into guidance when there is not.
//! 3.  **Compile**: a `Compiler` built over the stage registries walks the graph breadth-first from
//!     start and resolves each stage node into a `CompiledOperation`.
//! 4.  **Run**: hand the operations to your `ExecutionEngine`, directly or through `FlowRunner`.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowline::prelude::*;
//!
//! let flow = FlowDefinition::new(
//!     vec![
//!         FlowNodeDefinition::new("start", "start"),
//!         FlowNodeDefinition::new("keep", "select"),
//!         FlowNodeDefinition::new("adults", "filter"),
//!         FlowNodeDefinition::new("end", "end"),
//!     ],
//!     vec![
//!         FlowEdgeDefinition::new("start", "keep"),
//!         FlowEdgeDefinition::new("keep", "adults"),
//!         FlowEdgeDefinition::new("adults", "end"),
//!     ],
//! );
//!
//! let stages = StageSnapshot::from_json(
//!     r#"{
//!         "selects": [{ "id": "keep", "op": "select", "column": "name|age" }],
//!         "filters": [{ "id": "adults", "op": "filter", "mode": "ge", "column": "age", "value": "18" }]
//!     }"#,
//! )
//! .expect("stage configuration is valid");
//!
//! let verdict = PathValidator::new().validate(&flow);
//! assert!(verdict.is_valid());
//! assert_eq!(verdict.path, ["start", "keep", "adults", "end"]);
//!
//! let operations = stages.compiler().compile(&flow);
//! assert_eq!(PlanFormatter::summary(&operations), "select(name|age),filter(ge)");
//! ```

pub mod backend;
pub mod compiler;
pub mod data;
pub mod error;
pub mod flow;
pub mod graph;
pub mod operation;
pub mod prelude;
pub mod registry;
pub mod trace;
pub mod ui;
pub mod validation;
