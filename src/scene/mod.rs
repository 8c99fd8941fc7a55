//! Scene Graph Module
//!
//! Manages the node tree traversed once per frame:
//! - Node: hierarchy, flag overrides and an optional geometry
//! - Scene: node container with attach/detach helpers
//! - traverse: depth-first walker that drives the flag stack

pub mod node;
pub mod scene;
pub mod traverse;

pub use node::Node;
pub use scene::Scene;
pub use traverse::{NodeVisitor, TraversalStats, walk};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}

/// Opaque identifier of the geometry a node draws.
pub type GeometryId = u32;
