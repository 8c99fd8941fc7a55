//! Render Context
//!
//! Owns the flag stack of one scene / render target and exposes the two
//! trigger points of a frame:
//!
//! - [`begin_frame`](RenderContext::begin_frame): reset to the baseline
//! - [`prepare_consumption`](RenderContext::prepare_consumption): export the
//!   effective flags to a sink if they changed
//!
//! Each independently rendered scene needs its own context; stacks are never
//! shared between traversals.

use crate::renderer::settings::RendererSettings;
use crate::state::{FlagSink, FlagStack};

#[derive(Debug, Clone)]
pub struct RenderContext {
    stack: FlagStack,
    frame_count: u64,
}

impl RenderContext {
    #[must_use]
    pub fn new(settings: &RendererSettings) -> Self {
        Self {
            stack: settings.build_stack(),
            frame_count: 0,
        }
    }

    /// Starts a frame: resets the stack to the baseline and marks it dirty.
    pub fn begin_frame(&mut self) {
        self.frame_count += 1;
        log::trace!("Frame {} begin", self.frame_count);
        self.stack.reset();
    }

    /// Exports the effective flags to `sink` if they changed since the last
    /// export. Returns `true` if the sink was invoked.
    pub fn prepare_consumption<S>(&mut self, sink: &mut S) -> bool
    where
        S: FlagSink + ?Sized,
    {
        Self::consume_from(&mut self.stack, sink)
    }

    /// Pre-consumption step on a stack borrowed out of the context, as a
    /// visitor holds it during `walk`.
    pub fn consume_from<S>(stack: &mut FlagStack, sink: &mut S) -> bool
    where
        S: FlagSink + ?Sized,
    {
        stack.consume_if_dirty(sink)
    }

    /// Forces the stack back to the baseline after an aborted traversal.
    pub fn abort_frame(&mut self) {
        log::warn!(
            "Frame {} aborted at flag depth {}, resetting state",
            self.frame_count,
            self.stack.depth()
        );
        self.stack.reset();
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn stack(&self) -> &FlagStack {
        &self.stack
    }

    #[inline]
    pub fn stack_mut(&mut self) -> &mut FlagStack {
        &mut self.stack
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&RendererSettings::default())
    }
}
