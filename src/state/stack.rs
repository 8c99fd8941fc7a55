//! Flag Stack
//!
//! Hierarchical render-flag state for one traversal. Every node that is
//! entered pushes a merged snapshot and pops it on the way back out, so the
//! top of the stack is always the effective state of the node being visited.
//!
//! # Lifecycle
//!
//! 1. [`FlagStack::reset`] once per frame seeds the baseline snapshot.
//! 2. The walker brackets each node with [`push`](FlagStack::push) /
//!    [`pop`](FlagStack::pop) (or a [`FlagScope`] guard).
//! 3. Right before the backend needs authoritative state,
//!    [`consume_if_dirty`](FlagStack::consume_if_dirty) exports the top
//!    snapshot to a [`FlagSink`], but only if it changed since the last export.
//!
//! # Contract
//!
//! Popping the baseline snapshot, or reading/pushing before the first reset,
//! is a traversal bug and panics. An aborted traversal must call `reset()`
//! instead of trying to unwind its pushes.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::state::flags::{FlagOverrides, RenderFlags};
use crate::state::sink::FlagSink;

/// Number of snapshots stored inline before the stack spills to the heap.
const INLINE_DEPTH: usize = 32;

/// When a dirty stack actually reaches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPolicy {
    /// Export on every dirty consumption, even if the value did not change.
    #[default]
    Always,
    /// Skip the export when the top equals the last exported snapshot.
    ///
    /// Reduces sink invocations at the cost of changing export frequency.
    OnChange,
}

/// Stack of effective render-flag snapshots plus the dirty bit.
#[derive(Debug, Clone)]
pub struct FlagStack {
    frames: SmallVec<[RenderFlags; INLINE_DEPTH]>,
    baseline: RenderFlags,
    policy: ExportPolicy,
    dirty: bool,
    last_exported: Option<RenderFlags>,
    exports: u64,
    generation: u64,
}

impl FlagStack {
    /// Creates an empty stack with the default baseline.
    ///
    /// The stack is unusable until [`reset`](Self::reset) has run.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RenderFlags::DEFAULT, ExportPolicy::Always)
    }

    #[must_use]
    pub fn with_config(baseline: RenderFlags, policy: ExportPolicy) -> Self {
        Self {
            frames: SmallVec::new(),
            baseline,
            policy,
            dirty: false,
            last_exported: None,
            exports: 0,
            generation: 0,
        }
    }

    /// Pre-allocates room for `additional` snapshots beyond the current depth.
    pub fn reserve(&mut self, additional: usize) {
        self.frames.reserve(additional);
    }

    /// Clears the stack down to the baseline snapshot and marks it dirty.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(self.baseline);
        self.last_exported = None;
        self.generation = self.generation.wrapping_add(1);
        self.mark_dirty();
    }

    /// Pushes `overrides` merged onto the current top.
    ///
    /// An empty override set still pushes, so every node entry has exactly
    /// one matching pop. Always marks the stack dirty.
    pub fn push(&mut self, overrides: &FlagOverrides) {
        let merged = overrides.apply(self.top());
        self.frames.push(merged);
        self.mark_dirty();
    }

    /// Removes the top snapshot, restoring the parent's state.
    ///
    /// # Panics
    ///
    /// Panics if only the baseline snapshot is left.
    pub fn pop(&mut self) {
        assert!(
            self.frames.len() > 1,
            "FlagStack underflow: pop() without a matching push() (depth {})",
            self.frames.len()
        );
        self.frames.pop();
        self.mark_dirty();
    }

    /// Pushes `overrides` and returns a guard that pops when dropped.
    pub fn scope(&mut self, overrides: &FlagOverrides) -> FlagScope<'_> {
        self.push(overrides);
        let depth = self.depth();
        let generation = self.generation;
        FlagScope {
            stack: self,
            depth,
            generation,
        }
    }

    /// Effective state at the current traversal point.
    ///
    /// # Panics
    ///
    /// Panics if [`reset`](Self::reset) has never been called.
    #[inline]
    #[must_use]
    pub fn current(&self) -> RenderFlags {
        self.top()
    }

    /// Number of snapshots on the stack, baseline included.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn baseline(&self) -> RenderFlags {
        self.baseline
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> ExportPolicy {
        self.policy
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Total number of snapshots delivered to sinks by this stack.
    #[inline]
    #[must_use]
    pub fn exports(&self) -> u64 {
        self.exports
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Exports the current snapshot to `sink` if it changed since the last
    /// consumption, then clears the dirty bit.
    ///
    /// Returns `true` if the sink was invoked.
    pub fn consume_if_dirty<S>(&mut self, sink: &mut S) -> bool
    where
        S: FlagSink + ?Sized,
    {
        if !self.dirty {
            return false;
        }

        let flags = self.top();
        self.dirty = false;

        if self.policy == ExportPolicy::OnChange && self.last_exported == Some(flags) {
            log::trace!("Flags unchanged since last export, skipping sink");
            return false;
        }

        log::trace!("Exporting flags {flags:?}");
        sink.accept(&flags);
        self.last_exported = Some(flags);
        self.exports += 1;
        true
    }

    #[inline]
    fn top(&self) -> RenderFlags {
        assert!(!self.frames.is_empty(), "FlagStack used before reset()");
        self.frames[self.frames.len() - 1]
    }
}

impl Default for FlagStack {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`FlagStack::scope`].
///
/// Derefs to the stack so that nested scopes can be opened through it. When
/// dropped, pops the snapshot it pushed, unless the stack was reset in the
/// meantime (an aborted traversal).
pub struct FlagScope<'a> {
    stack: &'a mut FlagStack,
    depth: usize,
    generation: u64,
}

impl Deref for FlagScope<'_> {
    type Target = FlagStack;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl DerefMut for FlagScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl Drop for FlagScope<'_> {
    fn drop(&mut self) {
        if self.stack.generation != self.generation {
            log::debug!("Flag scope closed after a stack reset, nothing to pop");
            return;
        }

        let depth = self.stack.depth();
        if depth == self.depth {
            self.stack.pop();
        } else if !std::thread::panicking() {
            panic!(
                "FlagScope closed at depth {depth}, expected {}: unbalanced push/pop inside the scope",
                self.depth
            );
        }
    }
}
