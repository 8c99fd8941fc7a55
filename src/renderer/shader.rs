//! Shader Flag State
//!
//! Backend side of the flag export. The shader module keeps the last
//! snapshot it was handed and bakes it into every draw call until the next
//! export. Flags only toggle uniform switches; they never cause a program
//! rebuild.

use smallvec::SmallVec;

use crate::state::{Flag, FlagSink, RenderFlags};

/// Flag state as seen by the shader backend.
#[derive(Debug, Clone, Default)]
pub struct ShaderState {
    flags: RenderFlags,
    version: u64,
}

impl ShaderState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot baked into subsequent draws.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    /// Number of snapshots accepted so far.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Packs the flags as a uniform bit mask, one bit per [`Flag`].
    #[inline]
    #[must_use]
    pub fn uniform_mask(&self) -> u32 {
        u32::from(self.flags.bits().bits())
    }

    /// Names of the currently enabled switches.
    #[must_use]
    pub fn enabled_switches(&self) -> SmallVec<[&'static str; 5]> {
        Flag::ALL
            .into_iter()
            .filter(|&flag| self.flags.get(flag))
            .map(Flag::name)
            .collect()
    }
}

impl FlagSink for ShaderState {
    fn accept(&mut self, flags: &RenderFlags) {
        self.flags = *flags;
        self.version = self.version.wrapping_add(1);
    }
}
