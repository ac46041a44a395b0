use crate::error::FlowConversionError;
use crate::flow::{FlowDefinition, FlowEdgeDefinition, FlowNodeDefinition, IntoFlow, NodePosition};
use serde::Deserialize;

/// A node as the graph editor serializes it
#[derive(Debug, Deserialize, Clone)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Option<NodePosition>,
    /// Editor-private state, carried through untouched.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// An edge as the graph editor serializes it
#[derive(Debug, Deserialize, Clone)]
pub struct UiEdge {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Complete editor graph document
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UiFlow {
    #[serde(default)]
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
}

impl UiFlow {
    pub fn from_json(json: &str) -> Result<Self, FlowConversionError> {
        serde_json::from_str(json).map_err(|e| FlowConversionError::JsonParseError(e.to_string()))
    }
}

impl IntoFlow for UiFlow {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| {
                if node.id.trim().is_empty() {
                    return Err(FlowConversionError::ValidationError(
                        "node without an id".to_string(),
                    ));
                }
                Ok(FlowNodeDefinition {
                    id: node.id,
                    kind: node.node_type.into(),
                    label: node.label,
                    position: node.position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Half-drawn edges are dropped, matching what the editor shows as unconnected.
        let edges = self
            .edges
            .into_iter()
            .filter_map(|edge| match (edge.source, edge.target) {
                (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
                    Some(FlowEdgeDefinition::new(source, target))
                }
                _ => None,
            })
            .collect();

        Ok(FlowDefinition { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::NodeKind;

    #[test]
    fn editor_document_converts_to_flow() {
        let json = r#"{
            "nodes": [
                {"id": "1", "type": "start", "position": {"x": 0, "y": 0}, "label": "Start"},
                {"id": "2", "type": "filter", "data": {"anything": true}}
            ],
            "edges": [
                {"id": "e1-2", "source": "1", "target": "2"},
                {"id": "dangling", "source": "2"},
                {"id": "null-end", "source": "1", "target": null},
                {"id": "blank-start", "source": "", "target": "2"}
            ]
        }"#;
        let flow = UiFlow::from_json(json).unwrap().into_flow().unwrap();
        assert_eq!(flow.nodes.len(), 2);
        assert_eq!(flow.nodes[0].kind, NodeKind::Start);
        assert_eq!(flow.nodes[0].label.as_deref(), Some("Start"));
        assert_eq!(flow.nodes[1].kind, NodeKind::Filter);
        assert_eq!(flow.edges, vec![FlowEdgeDefinition::new("1", "2")]);
    }

    #[test]
    fn node_without_id_is_rejected() {
        let json = r#"{"nodes": [{"id": "", "type": "start"}], "edges": []}"#;
        let result = UiFlow::from_json(json).unwrap().into_flow();
        assert!(matches!(result, Err(FlowConversionError::ValidationError(_))));
    }
}
