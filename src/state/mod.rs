//! Render State Module
//!
//! Hierarchical render-flag propagation for scene traversal:
//!
//! - [`Flag`] / [`RenderFlags`]: the closed category set and its total snapshot
//! - [`FlagOverrides`]: partial values carried by "flags" nodes
//! - [`FlagStack`]: per-traversal snapshot stack with dirty tracking
//! - [`FlagSink`]: backend consumer of exported snapshots
//!
//! # Example
//!
//! ```rust
//! use strata::state::{Flag, FlagOverrides, FlagStack, RenderFlags};
//!
//! let mut stack = FlagStack::new();
//! stack.reset();
//! stack.push(&FlagOverrides::new().with(Flag::Fog, false));
//! assert!(!stack.current().fog());
//! assert!(stack.current().visible());
//!
//! let mut exported = None;
//! assert!(stack.consume_if_dirty(&mut |flags: &RenderFlags| exported = Some(*flags)));
//! assert!(!stack.consume_if_dirty(&mut |_: &RenderFlags| {}));
//! assert_eq!(exported.map(|flags| flags.fog()), Some(false));
//! stack.pop();
//! ```

pub mod flags;
pub mod sink;
pub mod stack;

pub use flags::{Flag, FlagBits, FlagOverrides, RenderFlags};
pub use sink::FlagSink;
pub use stack::{ExportPolicy, FlagScope, FlagStack};
