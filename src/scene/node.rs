use crate::scene::{GeometryId, NodeHandle};
use crate::state::FlagOverrides;

/// A scene node: hierarchy plus the render-state data the walker needs.
///
/// # Hierarchy
///
/// Nodes form a tree structure through parent-child relationships:
/// - `parent`: Optional handle to parent node (None for root nodes)
/// - `children`: List of child node handles, visited in order
///
/// # Render State
///
/// - `flags`: overrides pushed on entry and popped on exit. An empty set
///   still brackets the subtree, keeping pushes and pops matched.
/// - `geometry`: when present the node issues a draw call under the
///   effective flags of its position in the tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    /// Flag overrides for this node's subtree.
    pub flags: FlagOverrides,
    /// Geometry drawn at this node, if any.
    pub geometry: Option<GeometryId>,
}

impl Node {
    /// Creates a pass-through node with no overrides and no geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a "flags" node carrying `flags` for its subtree.
    #[must_use]
    pub fn with_flags(flags: FlagOverrides) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Creates a leaf that draws `geometry`.
    #[must_use]
    pub fn with_geometry(geometry: GeometryId) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}
