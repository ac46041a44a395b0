//! Execution path validation.
//!
//! A flow is runnable when it has exactly one `start` node and a breadth-first
//! walk from that node reaches a node without outgoing edges. The first such
//! node in BFS order wins; other branches are not inspected, so a valid verdict
//! proves that one run from start to a leaf exists, not that every branch is
//! well formed.

use crate::flow::{FlowDefinition, NodeKind};
use crate::graph::AdjacencyIndex;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Why a flow was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NoStart,
    MultiStart,
    NoLeafNode,
    NoPath,
}

impl InvalidReason {
    pub fn code(&self) -> &'static str {
        match self {
            InvalidReason::NoStart => "no_start",
            InvalidReason::MultiStart => "multi_start",
            InvalidReason::NoLeafNode => "no_leaf_node",
            InvalidReason::NoPath => "no_path",
        }
    }

    /// A message suitable for showing to the person editing the flow.
    pub fn guidance(&self) -> &'static str {
        match self {
            InvalidReason::NoStart => "The flow has no start node. Add one start node.",
            InvalidReason::MultiStart => {
                "The flow has more than one start node. Keep exactly one."
            }
            InvalidReason::NoLeafNode => {
                "Every node has an outgoing connection. End the flow with a node that has none."
            }
            InvalidReason::NoPath => "No node without outgoing connections is reachable from start.",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The verdict of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Node ids from the start node to the chosen leaf. Empty when invalid.
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
}

impl ValidationResult {
    fn valid(path: Vec<String>) -> Self {
        Self {
            valid: true,
            path,
            reason: None,
        }
    }

    fn invalid(reason: InvalidReason) -> Self {
        Self {
            valid: false,
            path: Vec::new(),
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Checks that a flow describes one coherent, terminating execution path.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathValidator;

impl PathValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, flow: &FlowDefinition) -> ValidationResult {
        let result = Self::check(flow);
        match result.reason {
            None => tracing::debug!(path = ?result.path, "flow path is valid"),
            Some(reason) => tracing::debug!(%reason, "flow path is invalid"),
        }
        result
    }

    fn check(flow: &FlowDefinition) -> ValidationResult {
        let mut starts = flow.start_nodes();
        let start = match (starts.next(), starts.next()) {
            (None, _) => return ValidationResult::invalid(InvalidReason::NoStart),
            (Some(_), Some(_)) => return ValidationResult::invalid(InvalidReason::MultiStart),
            (Some(start), None) => start.id.as_str(),
        };

        let index = AdjacencyIndex::forward(flow);

        let has_leaf = flow.nodes.iter().any(|node| {
            if index.has_outgoing(&node.id) {
                return false;
            }
            node.kind != NodeKind::Start || node.id == start
        });
        if !has_leaf {
            return ValidationResult::invalid(InvalidReason::NoLeafNode);
        }

        let mut parents: AHashMap<&str, &str> = AHashMap::new();
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(id) = queue.pop_front() {
            let successors = index.successors(id);
            if successors.is_empty() {
                return ValidationResult::valid(trace_back(&parents, id));
            }
            for &next in successors {
                if visited.insert(next) {
                    parents.insert(next, id);
                    queue.push_back(next);
                }
            }
        }

        ValidationResult::invalid(InvalidReason::NoPath)
    }
}

/// Rebuilds the BFS path ending at `leaf` from the parent links.
fn trace_back(parents: &AHashMap<&str, &str>, leaf: &str) -> Vec<String> {
    let mut path = vec![leaf.to_string()];
    let mut current = leaf;
    while let Some(&parent) = parents.get(current) {
        path.push(parent.to_string());
        current = parent;
    }
    path.reverse();
    path
}

/// Convenience wrapper around [`PathValidator::validate`].
pub fn validate_execution_path(flow: &FlowDefinition) -> ValidationResult {
    PathValidator::new().validate(flow)
}
