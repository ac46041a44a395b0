use crate::flow::FlowDefinition;
use ahash::{AHashMap, AHashSet};

/// Forward (and optionally reverse) adjacency over a borrowed flow.
///
/// Successor lists keep the declaration order of `FlowDefinition::edges`.
/// Edges whose source or target is not a node of the flow are ignored.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex<'a> {
    forward: AHashMap<&'a str, Vec<&'a str>>,
    reverse: Option<AHashMap<&'a str, Vec<&'a str>>>,
    node_order: Vec<&'a str>,
}

impl<'a> AdjacencyIndex<'a> {
    /// Builds the forward index only.
    pub fn forward(flow: &'a FlowDefinition) -> Self {
        Self::build(flow, false)
    }

    /// Builds both the forward and the reverse index.
    pub fn bidirectional(flow: &'a FlowDefinition) -> Self {
        Self::build(flow, true)
    }

    fn build(flow: &'a FlowDefinition, with_reverse: bool) -> Self {
        let node_ids: AHashSet<&str> = flow.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut forward: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
        let mut reverse: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();

        for edge in &flow.edges {
            let (source, target) = (edge.source.as_str(), edge.target.as_str());
            if !node_ids.contains(source) || !node_ids.contains(target) {
                continue;
            }
            forward.entry(source).or_default().push(target);
            if with_reverse {
                reverse.entry(target).or_default().push(source);
            }
        }

        Self {
            forward,
            reverse: with_reverse.then_some(reverse),
            node_order: flow.nodes.iter().map(|n| n.id.as_str()).collect(),
        }
    }

    /// Outgoing targets of `node_id` in edge order. Empty for leaves and unknown ids.
    pub fn successors(&self, node_id: &str) -> &[&'a str] {
        self.forward.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming sources of `node_id`, or `None` if the reverse index was not built.
    pub fn predecessors(&self, node_id: &str) -> Option<&[&'a str]> {
        self.reverse
            .as_ref()
            .map(|rev| rev.get(node_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn has_outgoing(&self, node_id: &str) -> bool {
        self.forward.contains_key(node_id)
    }

    /// Nodes that have outgoing edges but no incoming ones, in node declaration
    /// order. Returns `None` without a reverse index.
    pub fn roots(&self) -> Option<Vec<&'a str>> {
        let reverse = self.reverse.as_ref()?;
        Some(
            self.node_order
                .iter()
                .copied()
                .filter(|id| self.forward.contains_key(id) && !reverse.contains_key(id))
                .collect(),
        )
    }
}
