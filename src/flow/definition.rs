use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete, canonical definition of a flow, ready for validation and compilation.
/// This is the target structure for any editor document conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub nodes: Vec<FlowNodeDefinition>,
    /// Connections between nodes. Declaration order is significant: traversal
    /// visits the successors of a node in the order their edges appear here,
    /// which decides the tie-break between sibling branches.
    pub edges: Vec<FlowEdgeDefinition>,
}

impl FlowDefinition {
    pub fn new(nodes: Vec<FlowNodeDefinition>, edges: Vec<FlowEdgeDefinition>) -> Self {
        Self { nodes, edges }
    }

    /// Finds a node by id.
    pub fn node(&self, id: &str) -> Option<&FlowNodeDefinition> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// All nodes of kind `start`, in declaration order.
    pub fn start_nodes(&self) -> impl Iterator<Item = &FlowNodeDefinition> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Start)
    }
}

/// A single node of the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeDefinition {
    pub id: String,
    pub kind: NodeKind,
    /// Editor-only payload, ignored by validation and compilation.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Option<NodePosition>,
}

impl FlowNodeDefinition {
    pub fn new(id: impl Into<String>, kind: impl Into<NodeKind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: None,
            position: None,
        }
    }
}

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// A directed connection from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdgeDefinition {
    pub source: String,
    pub target: String,
}

impl FlowEdgeDefinition {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The type tag of a node.
///
/// `Start` and `End` are structural: they delimit the pipeline but never carry
/// an operation. Every other kind is a stage resolved through a registry.
/// Unknown tags are preserved in `Other` so custom stage kinds can be routed
/// without changing this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Start,
    End,
    Select,
    Filter,
    Str,
    Rename,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Select => "select",
            NodeKind::Filter => "filter",
            NodeKind::Str => "str",
            NodeKind::Rename => "rename",
            NodeKind::Other(name) => name,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, NodeKind::Start | NodeKind::End)
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag {
            "start" => NodeKind::Start,
            "end" => NodeKind::End,
            "select" => NodeKind::Select,
            "filter" => NodeKind::Filter,
            "str" => NodeKind::Str,
            "rename" => NodeKind::Rename,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match NodeKind::from(tag.as_str()) {
            NodeKind::Other(_) => NodeKind::Other(tag),
            known => known,
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
