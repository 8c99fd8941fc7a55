//! Scene & Traversal Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy, names, flags
//! - walk: push/pop bracketing, inherited state seen by visitors, culling
//! - Abort: visitor errors reset the stack and surface as TraversalAborted

use strata::scene::{Node, NodeHandle, Scene, walk};
use strata::state::{Flag, FlagOverrides, FlagStack, RenderFlags};
use strata::{Result, StrataError};

fn ready_stack() -> FlagStack {
    let mut stack = FlagStack::new();
    stack.reset();
    stack
}

fn no(flag: Flag) -> FlagOverrides {
    FlagOverrides::new().with(flag, false)
}

/// Walks `scene` and records the effective flags seen at every visited node.
fn collect_flags(scene: &Scene, stack: &mut FlagStack) -> Vec<(NodeHandle, RenderFlags)> {
    let mut seen = Vec::new();
    walk(
        scene,
        stack,
        &mut |handle: NodeHandle, _: &Node, stack: &mut FlagStack| -> Result<()> {
            seen.push((handle, stack.current()));
            Ok(())
        },
    )
    .unwrap();
    seen
}

// ============================================================================
// Scene Hierarchy
// ============================================================================

#[test]
fn scene_create_node_is_root() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    assert!(scene.get_node(handle).is_some());
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_create_node_with_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("fogless");
    assert_eq!(scene.get_name(handle), Some("fogless"));
    assert_eq!(scene.find_by_name("fogless"), Some(handle));
}

#[test]
fn scene_attach_sets_parent_child() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert!(scene.get_node(parent).unwrap().children().contains(&child));
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let parent1 = scene.create_node();
    let parent2 = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent1);
    scene.attach(child, parent2);

    assert!(!scene.get_node(parent1).unwrap().children().contains(&child));
    assert!(scene.get_node(parent2).unwrap().children().contains(&child));
}

#[test]
fn scene_attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let node = scene.create_node();
    scene.attach(node, node);
    assert_eq!(scene.get_node(node).unwrap().parent(), None);
}

#[test]
fn scene_attach_below_descendant_is_rejected() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.attach(parent, child);

    assert_eq!(scene.get_node(parent).unwrap().parent(), None);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
}

#[test]
fn scene_detach_makes_root() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.detach(child);

    assert_eq!(scene.get_node(child).unwrap().parent(), None);
    assert!(scene.root_nodes.contains(&child));
    assert!(scene.get_node(parent).unwrap().children().is_empty());
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);
    let grandchild = scene.add_to_parent(Node::new(), child);
    scene.set_name(grandchild, "leaf");

    scene.remove_node(parent);

    assert!(scene.get_node(parent).is_none());
    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert!(scene.root_nodes.is_empty());
    assert_eq!(scene.find_by_name("leaf"), None);
    assert!(scene.is_empty());
}

#[test]
fn scene_len_counts_live_nodes() {
    let mut scene = Scene::new();
    assert_eq!(scene.len(), 0);

    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);
    let other = scene.add_node(Node::new());
    assert_eq!(scene.len(), 3);

    scene.detach(child);
    assert_eq!(scene.len(), 3, "detached nodes stay in the scene");

    scene.remove_node(other);
    assert_eq!(scene.len(), 2);
    assert!(!scene.is_empty());
}

#[test]
fn scene_set_flags_and_geometry() {
    let mut scene = Scene::new();
    let handle = scene.create_node();

    assert!(scene.set_flags(handle, no(Flag::Fog)));
    assert!(scene.set_geometry(handle, Some(7)));

    let node = scene.get_node(handle).unwrap();
    assert_eq!(node.flags.get(Flag::Fog), Some(false));
    assert_eq!(node.geometry, Some(7));
}

#[test]
fn scene_unique_ids() {
    let s1 = Scene::new();
    let s2 = Scene::new();
    assert_ne!(s1.id, s2.id, "Each scene should have a unique ID");
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn walk_visitors_see_merged_ancestor_state() {
    let mut scene = Scene::new();
    let no_fog = scene.add_node(Node::with_flags(no(Flag::Fog)));
    let hidden = scene.add_to_parent(Node::with_flags(no(Flag::Visible)), no_fog);
    let plain = scene.add_to_parent(Node::new(), hidden);
    let sibling = scene.add_to_parent(Node::new(), no_fog);
    let other_root = scene.create_node();

    let mut stack = ready_stack();
    let seen = collect_flags(&scene, &mut stack);

    let base = RenderFlags::DEFAULT;
    assert_eq!(
        seen,
        vec![
            (no_fog, base.with(Flag::Fog, false)),
            (hidden, base.with(Flag::Fog, false).with(Flag::Visible, false)),
            (plain, base.with(Flag::Fog, false).with(Flag::Visible, false)),
            (sibling, base.with(Flag::Fog, false)),
            (other_root, base),
        ]
    );
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), base);
}

#[test]
fn walk_child_can_reenable_flag() {
    let mut scene = Scene::new();
    let off = scene.add_node(Node::with_flags(no(Flag::Picking)));
    let on = scene.add_to_parent(
        Node::with_flags(FlagOverrides::new().with(Flag::Picking, true)),
        off,
    );

    let mut stack = ready_stack();
    let seen = collect_flags(&scene, &mut stack);

    assert_eq!(seen[0], (off, RenderFlags::DEFAULT.with(Flag::Picking, false)));
    assert_eq!(seen[1], (on, RenderFlags::DEFAULT));
}

#[test]
fn walk_culls_disabled_subtrees() {
    let mut scene = Scene::new();
    let root = scene.create_node();
    let off = scene.add_to_parent(Node::with_flags(no(Flag::Enabled)), root);
    let below_off = scene.add_to_parent(Node::with_flags(FlagOverrides::new().with(Flag::Enabled, true)), off);
    let after = scene.add_to_parent(Node::new(), root);

    let mut stack = ready_stack();
    let mut seen = Vec::new();
    let stats = walk(
        &scene,
        &mut stack,
        &mut |handle: NodeHandle, _: &Node, _: &mut FlagStack| -> Result<()> {
            seen.push(handle);
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(seen, vec![root, after]);
    assert!(!seen.contains(&below_off), "subtree of a disabled node is never entered");
    assert_eq!(stats.visited, 2);
    assert_eq!(stats.culled, 1);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn walk_skips_removed_children() {
    let mut scene = Scene::new();
    let root = scene.create_node();
    let child = scene.add_to_parent(Node::new(), root);
    scene.nodes.remove(child);

    let mut stack = ready_stack();
    let seen = collect_flags(&scene, &mut stack);

    assert_eq!(seen.len(), 1);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn walk_visitor_error_aborts_and_resets() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::with_flags(no(Flag::Fog)));
    let deep = scene.add_to_parent(Node::new(), root);
    scene.add_to_parent(Node::new(), deep);

    let mut stack = ready_stack();
    let err = walk(
        &scene,
        &mut stack,
        &mut |handle: NodeHandle, _: &Node, _: &mut FlagStack| -> Result<()> {
            if handle == deep {
                Err(StrataError::Visitor("fragment not loaded".into()))
            } else {
                Ok(())
            }
        },
    )
    .unwrap_err();

    match err {
        StrataError::TraversalAborted { depth, source } => {
            assert_eq!(depth, 3);
            assert!(matches!(*source, StrataError::Visitor(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), RenderFlags::DEFAULT);
    assert!(stack.is_dirty());
}

#[test]
#[should_panic(expected = "Unbalanced flag stack")]
fn walk_detects_visitor_leaking_pushes() {
    let mut scene = Scene::new();
    scene.create_node();

    let mut stack = ready_stack();
    let _ = walk(
        &scene,
        &mut stack,
        &mut |_: NodeHandle, _: &Node, stack: &mut FlagStack| -> Result<()> {
            stack.push(&FlagOverrides::NONE);
            Ok(())
        },
    );
}

#[test]
fn walk_independent_stacks_per_scene() {
    let mut scene_a = Scene::new();
    scene_a.add_node(Node::with_flags(no(Flag::Fog)));
    let mut scene_b = Scene::new();
    scene_b.add_node(Node::new());

    let mut stack_a = ready_stack();
    let mut stack_b = ready_stack();

    let seen_a = collect_flags(&scene_a, &mut stack_a);
    let seen_b = collect_flags(&scene_b, &mut stack_b);

    assert!(!seen_a[0].1.fog());
    assert!(seen_b[0].1.fog());
}
