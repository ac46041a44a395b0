use super::adjacency::AdjacencyIndex;
use crate::flow::{FlowDefinition, FlowNodeDefinition};
use ahash::AHashSet;

/// Lists the nodes of a flow in connection order.
///
/// Walks depth-first (pre-order) from every root, roots in node declaration
/// order and children in edge order. Each node is listed once; nodes not
/// touched by any edge are left out.
pub fn nodes_in_edge_order(flow: &FlowDefinition) -> Vec<&FlowNodeDefinition> {
    let index = AdjacencyIndex::bidirectional(flow);
    let roots = index.roots().unwrap_or_default();

    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut ordered = Vec::new();

    for root in roots {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = flow.node(id) {
                ordered.push(node);
            }
            // Reversed so the first edge is explored first.
            stack.extend(index.successors(id).iter().rev().copied());
        }
    }

    ordered
}
