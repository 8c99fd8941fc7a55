//! Renderer Settings
//!
//! Configuration consumed once when a [`RenderContext`](super::RenderContext)
//! is created. Every field has a default, so a settings file only needs to
//! mention what it changes.
//!
//! ```rust
//! use strata::renderer::{ExportPolicy, RendererSettings};
//!
//! let settings = RendererSettings::from_json_str(
//!     r#"{ "baseline": { "fog": false }, "export_policy": "on_change" }"#,
//! )
//! .unwrap();
//!
//! assert!(!settings.baseline.fog());
//! assert!(settings.baseline.visible());
//! assert_eq!(settings.export_policy, ExportPolicy::OnChange);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::state::{ExportPolicy, FlagStack, RenderFlags};

/// Global configuration for the render-state stack.
///
/// | Field            | Description                                   | Default       |
/// |------------------|-----------------------------------------------|---------------|
/// | `baseline`       | Snapshot seeded by every frame reset          | all enabled   |
/// | `export_policy`  | Whether identical snapshots are re-exported   | `Always`      |
/// | `stack_capacity` | Snapshots reserved up front                   | 32            |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Snapshot at the bottom of the stack after each frame reset.
    pub baseline: RenderFlags,

    /// Export behaviour of the dirty tracker.
    ///
    /// `Always` keeps one sink call per dirty consumption. `OnChange` skips
    /// calls whose snapshot equals the previous export.
    pub export_policy: ExportPolicy,

    /// Expected maximum nesting of nodes; deeper scenes still work but may
    /// reallocate during the first frame.
    pub stack_capacity: usize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            baseline: RenderFlags::DEFAULT,
            export_policy: ExportPolicy::Always,
            stack_capacity: 32,
        }
    }
}

impl RendererSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds an unreset flag stack configured from these settings.
    #[must_use]
    pub fn build_stack(&self) -> FlagStack {
        let mut stack = FlagStack::with_config(self.baseline, self.export_policy);
        stack.reserve(self.stack_capacity);
        stack
    }
}
