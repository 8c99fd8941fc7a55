//! Scene Traversal
//!
//! Depth-first walk of the scene graph that drives the flag stack.
//!
//! Each node pushes its overrides before it is visited and pops them after
//! its last descendant, so a visitor always reads the merged state of every
//! ancestor through [`FlagStack::current`]. Uses an explicit work stack
//! instead of recursion so deep hierarchies cannot overflow the call stack.
//!
//! # Culling
//!
//! If a node's effective `enabled` flag is `false`, neither the node nor any
//! of its descendants is visited. Its push is still popped.
//!
//! # Abort
//!
//! A visitor error stops the walk. Outstanding pushes cannot be unwound
//! reliably at that point, so the stack is reset to the baseline and the
//! error is returned as [`StrataError::TraversalAborted`].

use crate::errors::{Result, StrataError};
use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene};
use crate::state::FlagStack;

/// Callback invoked for every node that survives culling.
pub trait NodeVisitor {
    /// Visits `node` with its own overrides already pushed on `stack`.
    fn visit(&mut self, handle: NodeHandle, node: &Node, stack: &mut FlagStack) -> Result<()>;
}

impl<F> NodeVisitor for F
where
    F: FnMut(NodeHandle, &Node, &mut FlagStack) -> Result<()>,
{
    fn visit(&mut self, handle: NodeHandle, node: &Node, stack: &mut FlagStack) -> Result<()> {
        self(handle, node, stack)
    }
}

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes handed to the visitor.
    pub visited: usize,
    /// Subtrees skipped because `enabled` was false.
    pub culled: usize,
    /// Deepest flag stack observed, baseline included.
    pub max_depth: usize,
}

enum Step {
    Enter(NodeHandle),
    Exit,
}

/// Walks every root of `scene` in order, bracketing each node with
/// push/pop on `stack`.
///
/// `stack` must have been reset for the current frame. On success the stack
/// is back at the depth it had on entry.
///
/// # Panics
///
/// Panics if the visitor leaves unbalanced pushes or pops on the stack.
pub fn walk<V>(scene: &Scene, stack: &mut FlagStack, visitor: &mut V) -> Result<TraversalStats>
where
    V: NodeVisitor + ?Sized,
{
    let entry_depth = stack.depth();
    let mut stats = TraversalStats {
        max_depth: entry_depth,
        ..TraversalStats::default()
    };

    let mut work: Vec<Step> = Vec::with_capacity(64);
    work.extend(scene.root_nodes.iter().rev().map(|&root| Step::Enter(root)));

    while let Some(step) = work.pop() {
        let handle = match step {
            Step::Exit => {
                stack.pop();
                continue;
            }
            Step::Enter(handle) => handle,
        };

        let Some(node) = scene.get_node(handle) else {
            log::warn!("Skipping dangling node handle {handle:?}");
            continue;
        };

        stack.push(&node.flags);
        stats.max_depth = stats.max_depth.max(stack.depth());

        if !stack.current().enabled() {
            log::debug!("Culled subtree at {handle:?}");
            stack.pop();
            stats.culled += 1;
            continue;
        }

        if let Err(err) = visitor.visit(handle, node, stack) {
            let depth = stack.depth();
            stack.reset();
            return Err(StrataError::TraversalAborted {
                depth,
                source: Box::new(err),
            });
        }
        stats.visited += 1;

        work.push(Step::Exit);
        work.extend(node.children.iter().rev().map(|&child| Step::Enter(child)));
    }

    assert_eq!(
        stack.depth(),
        entry_depth,
        "Unbalanced flag stack after traversal"
    );
    Ok(stats)
}
