use crate::flow::{CompiledFlow, FlowDefinition, FlowNodeDefinition, NodeKind};
use crate::graph::AdjacencyIndex;
use crate::operation::CompiledOperation;
use crate::registry::ConfigurationResolver;
use crate::trace::PlanFormatter;
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

mod builder;

pub use builder::CompilerBuilder;

/// Turns a flow into the ordered list of operations the engine runs.
///
/// The compiler walks the graph breadth-first from the `start` node and asks
/// the resolver registered for each node's kind for that node's
/// configuration. Structural nodes, nodes of unregistered kinds and nodes
/// without configuration contribute nothing. Compilation never fails; callers
/// wanting a reason for a short or empty result should run the
/// [`PathValidator`](crate::validation::PathValidator) first.
pub struct Compiler<'r> {
    resolvers: AHashMap<NodeKind, &'r dyn ConfigurationResolver>,
}

impl<'r> Compiler<'r> {
    pub fn builder() -> CompilerBuilder<'r> {
        CompilerBuilder::new()
    }

    /// The resolver nodes of `kind` are dispatched to, if any.
    pub fn resolver_for(&self, kind: &NodeKind) -> Option<&'r dyn ConfigurationResolver> {
        self.resolvers.get(kind).copied()
    }

    pub fn compile(&self, flow: &FlowDefinition) -> Vec<CompiledOperation> {
        let Some(start) = flow.start_nodes().next() else {
            tracing::warn!("flow has no start node; nothing to compile");
            return Vec::new();
        };

        let index = AdjacencyIndex::forward(flow);
        let mut nodes: AHashMap<&str, &FlowNodeDefinition> = AHashMap::new();
        for node in &flow.nodes {
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut operations = Vec::new();
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut queue = VecDeque::from([start.id.as_str()]);
        visited.insert(start.id.as_str());

        while let Some(id) = queue.pop_front() {
            if let Some(node) = nodes.get(id).filter(|n| !n.kind.is_structural()) {
                match self.resolve(node) {
                    Some(operation) => operations.push(operation),
                    None => tracing::debug!(node = %id, kind = %node.kind, "no configuration, skipping"),
                }
            }

            for &next in index.successors(id) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        tracing::info!("flow oper: {}", PlanFormatter::summary(&operations));
        operations
    }

    /// Same as [`Compiler::compile`], wrapped as a storable artifact.
    pub fn compile_flow(&self, flow: &FlowDefinition) -> CompiledFlow {
        CompiledFlow::new(self.compile(flow))
    }

    fn resolve(&self, node: &FlowNodeDefinition) -> Option<CompiledOperation> {
        self.resolvers.get(&node.kind)?.resolve(&node.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowEdgeDefinition;
    use crate::operation::{RawStageConfig, StageParameters};
    use crate::registry::{FilterRegistry, FnResolver, SelectRegistry};

    fn select(id: &str, column: &str) -> RawStageConfig {
        RawStageConfig {
            id: id.to_string(),
            op: "select".to_string(),
            column: Some(column.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn alias_routes_custom_kind_to_registered_resolver() {
        let mut selects = SelectRegistry::new();
        selects.insert_raw(&select("a", "name")).unwrap();
        let flow = FlowDefinition::new(
            vec![
                FlowNodeDefinition::new("s", "start"),
                FlowNodeDefinition::new("a", "pick"),
            ],
            vec![FlowEdgeDefinition::new("s", "a")],
        );

        let plain = Compiler::builder().with_resolver(&selects).build();
        assert!(plain.compile(&flow).is_empty());

        let aliased = Compiler::builder()
            .with_resolver(&selects)
            .with_kind_alias("pick", NodeKind::Select)
            .build();
        let ops = aliased.compile(&flow);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0].parameters, StageParameters::Select(_)));
    }

    #[test]
    fn alias_to_unregistered_kind_is_ignored() {
        let filters = FilterRegistry::new();
        let compiler = Compiler::builder()
            .with_resolver(&filters)
            .with_kind_alias("pick", NodeKind::Select)
            .build();
        assert!(compiler.resolver_for(&NodeKind::from("pick")).is_none());
        assert!(compiler.resolver_for(&NodeKind::Filter).is_some());
    }

    #[test]
    fn closure_resolver_serves_custom_kinds() {
        let mut selects = SelectRegistry::new();
        selects.insert_raw(&select("template", "id")).unwrap();
        let custom = FnResolver::new("dedupe", |node_id: &str| {
            selects.resolve("template").map(|mut op| {
                op.node_id = node_id.to_string();
                op.op = "dedupe".to_string();
                op
            })
        });
        let flow = FlowDefinition::new(
            vec![
                FlowNodeDefinition::new("s", "start"),
                FlowNodeDefinition::new("d", "dedupe"),
            ],
            vec![FlowEdgeDefinition::new("s", "d")],
        );
        let ops = Compiler::builder().with_resolver(&custom).build().compile(&flow);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].node_id, "d");
        assert_eq!(ops[0].op, "dedupe");
    }

    #[test]
    fn missing_start_compiles_to_nothing() {
        let mut selects = SelectRegistry::new();
        selects.insert_raw(&select("a", "name")).unwrap();
        let flow = FlowDefinition::new(vec![FlowNodeDefinition::new("a", "select")], vec![]);
        let compiler = Compiler::builder().with_resolver(&selects).build();
        assert!(compiler.compile(&flow).is_empty());
    }
}
