//! World-space preserving resets over an abstract transform hierarchy.

pub mod compensator;
pub mod scene_graph;
pub mod snapshot;

pub use compensator::TransformCompensator;
pub use scene_graph::SceneGraph;
pub use snapshot::{Drift, NodeState, Snapshot};
