//! Derived, per-pass graph structures.

pub mod adjacency;
pub mod order;

pub use adjacency::AdjacencyIndex;
pub use order::nodes_in_edge_order;
