use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::{SecondaryMap, SlotMap};

use crate::scene::node::Node;
use crate::scene::{GeometryId, NodeHandle};
use crate::state::FlagOverrides;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// `Scene` is pure data: the node tree and its per-node render-state
/// configuration. It owns no traversal state; each frame the renderer walks
/// it with its own [`FlagStack`](crate::state::FlagStack), so several scenes
/// can be rendered independently.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    names: SecondaryMap<NodeHandle, String>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            names: SecondaryMap::new(),
        }
    }

    /// Creates an empty root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.set_name(handle, name);
        handle
    }

    /// Adds a node to the scene as a root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`.
    ///
    /// Falls back to a root node if `parent` does not exist.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node {parent:?} not found, adding child as root");
            return self.add_node(child);
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);
        handle
    }

    /// Moves `child` (and its subtree) under `parent`.
    ///
    /// Attaching a node to itself or to one of its own descendants is
    /// rejected, since it would make the traversal cyclic.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("attach: unknown node ({child:?} -> {parent:?})");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach node {child:?} below its own descendant {parent:?}");
            return;
        }

        self.unlink(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Detaches `handle` from its parent and makes it a root node.
    pub fn detach(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) || self.nodes[handle].parent.is_none() {
            return;
        }
        self.unlink(handle);
        self.root_nodes.push(handle);
    }

    /// Removes a node together with its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);

        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current) {
                pending.extend(node.children);
            }
            self.names.remove(current);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Replaces the flag overrides of `handle`. Returns `false` if the node
    /// does not exist.
    pub fn set_flags(&mut self, handle: NodeHandle, flags: FlagOverrides) -> bool {
        match self.nodes.get_mut(handle) {
            Some(node) => {
                node.flags = flags;
                true
            }
            None => false,
        }
    }

    /// Sets the geometry drawn by `handle`. Returns `false` if the node does
    /// not exist.
    pub fn set_geometry(&mut self, handle: NodeHandle, geometry: Option<GeometryId>) -> bool {
        match self.nodes.get_mut(handle) {
            Some(node) => {
                node.geometry = geometry;
                true
            }
            None => false,
        }
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_owned());
        }
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    /// Finds the first node with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.names
            .iter()
            .find_map(|(handle, n)| (n == name).then_some(handle))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes `handle` from its parent's child list, or from the roots.
    fn unlink(&mut self, handle: NodeHandle) {
        let parent = self.nodes[handle].parent.take();
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(pos) = p.children.iter().position(|&c| c == handle)
                {
                    p.children.remove(pos);
                }
            }
            None => {
                if let Some(pos) = self.root_nodes.iter().position(|&r| r == handle) {
                    self.root_nodes.remove(pos);
                }
            }
        }
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `node`.
    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }
}
