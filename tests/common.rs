//! Common test utilities for building flows and stage registries.
use flowline::prelude::*;

/// Builds a flow from `(id, kind)` pairs and `(source, target)` edges, keeping
/// the given edge order.
#[allow(dead_code)]
pub fn flow(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> FlowDefinition {
    FlowDefinition::new(
        nodes
            .iter()
            .map(|(id, kind)| FlowNodeDefinition::new(*id, *kind))
            .collect(),
        edges
            .iter()
            .map(|(source, target)| FlowEdgeDefinition::new(*source, *target))
            .collect(),
    )
}

/// `start -> a (select) -> b (filter) -> end`
#[allow(dead_code)]
pub fn create_linear_flow() -> FlowDefinition {
    flow(
        &[
            ("start", "start"),
            ("a", "select"),
            ("b", "filter"),
            ("end", "end"),
        ],
        &[("start", "a"), ("a", "b"), ("b", "end")],
    )
}

/// Stage configuration for the nodes of [`create_linear_flow`].
#[allow(dead_code)]
pub fn create_linear_stages() -> StageSnapshot {
    StageSnapshot::from_json(LINEAR_STAGES_JSON).expect("fixture stages must parse")
}

#[allow(dead_code)]
pub const LINEAR_STAGES_JSON: &str = r#"{
    "selects": [
        { "id": "a", "op": "select", "column": "name|age|city" }
    ],
    "filters": [
        { "id": "b", "op": "filter", "mode": "gt", "column": "age", "value": "30", "logic": "and" }
    ]
}"#;

/// A flow as the graph editor saves it, covering every stage kind.
#[allow(dead_code)]
pub const EDITOR_FLOW_JSON: &str = r#"{
    "nodes": [
        { "id": "1", "type": "start", "label": "Start", "position": { "x": 0, "y": 0 } },
        { "id": "2", "type": "select", "position": { "x": 200, "y": 0 } },
        { "id": "3", "type": "filter", "position": { "x": 400, "y": 0 } },
        { "id": "4", "type": "str", "position": { "x": 600, "y": 0 } },
        { "id": "5", "type": "rename", "position": { "x": 800, "y": 0 } },
        { "id": "6", "type": "end", "label": "End", "position": { "x": 1000, "y": 0 } }
    ],
    "edges": [
        { "id": "e1-2", "source": "1", "target": "2" },
        { "id": "e2-3", "source": "2", "target": "3" },
        { "id": "e3-4", "source": "3", "target": "4" },
        { "id": "e4-5", "source": "4", "target": "5" },
        { "id": "e5-6", "source": "5", "target": "6" }
    ]
}"#;

/// Stage configuration for [`EDITOR_FLOW_JSON`], plus one orphaned record.
#[allow(dead_code)]
pub const EDITOR_STAGES_JSON: &str = r#"{
    "selects": [
        { "id": "2", "op": "select", "column": "name|city|salary" }
    ],
    "filters": [
        { "id": "3", "op": "filter", "mode": "equal", "column": "city", "value": "Oslo|Bergen", "logic": "or" }
    ],
    "strs": [
        { "id": "4", "op": "str", "mode": "upper", "column": "name", "comparand": "", "replacement": "", "newcol": "" }
    ],
    "renames": [
        { "id": "5", "op": "rename", "column": "salary", "value": "income" },
        { "id": "99", "op": "rename", "column": "stale", "value": "gone" }
    ]
}"#;

/// Node ids of compiled operations, in order.
#[allow(dead_code)]
pub fn node_ids(operations: &[CompiledOperation]) -> Vec<&str> {
    operations.iter().map(|op| op.node_id.as_str()).collect()
}
