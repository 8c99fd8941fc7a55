//! Flag Sink
//!
//! The receiving end of a flag export. A sink is handed the merged snapshot
//! whenever the stack is consumed while dirty, and bakes it into the draw
//! calls that follow.

use crate::state::flags::RenderFlags;

/// Backend consumer of exported render flags.
pub trait FlagSink {
    /// Receives the effective snapshot at the current traversal point.
    fn accept(&mut self, flags: &RenderFlags);
}

impl<F> FlagSink for F
where
    F: FnMut(&RenderFlags),
{
    #[inline]
    fn accept(&mut self, flags: &RenderFlags) {
        self(flags);
    }
}
