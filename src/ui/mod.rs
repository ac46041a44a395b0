pub mod types;

pub use types::{UiEdge, UiFlow, UiNode};
