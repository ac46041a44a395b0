use super::definition::FlowDefinition;
use crate::error::FlowConversionError;

/// A trait for editor documents that can be converted into a `FlowDefinition`.
///
/// This is the extension point that keeps the compiler independent of any one
/// node editor. Implement it on the structs your editor serializes to, and the
/// validator and compiler can process your graphs.
///
/// # Example
///
/// ```rust,no_run
/// use flowline::error::FlowConversionError;
/// use flowline::flow::{FlowDefinition, FlowEdgeDefinition, FlowNodeDefinition, IntoFlow};
///
/// struct MyNode { key: String, tag: String }
/// struct MyGraph { nodes: Vec<MyNode>, links: Vec<(String, String)> }
///
/// impl IntoFlow for MyGraph {
///     fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
///         let nodes = self
///             .nodes
///             .into_iter()
///             .map(|n| FlowNodeDefinition::new(n.key, n.tag.as_str()))
///             .collect();
///         let edges = self
///             .links
///             .into_iter()
///             .map(|(from, to)| FlowEdgeDefinition::new(from, to))
///             .collect();
///         Ok(FlowDefinition::new(nodes, edges))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the document and converts it into a flow definition.
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError>;
}
