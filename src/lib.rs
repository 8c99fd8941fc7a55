//! Strata
//!
//! Hierarchical render-state propagation for scene-graph renderers.
//!
//! Scenes are trees of nodes; "flags" nodes switch render features (fog,
//! color transforms, picking, traversal, visibility) on or off for their
//! subtree. Once per frame the tree is walked depth-first and every node
//! pushes a merged snapshot of those flags onto a [`FlagStack`], so each node
//! reads the effective state of all its ancestors in O(1). A dirty bit makes
//! sure the backend only receives a new snapshot when the state changed.
//!
//! # Modules
//!
//! - [`state`]: flags, overrides, the stack and the sink trait
//! - [`scene`]: node tree and depth-first walker
//! - [`renderer`]: frame driver, settings and the shader-side sink
//! - [`errors`]: recoverable error types
//!
//! # Example
//!
//! ```rust
//! use strata::{Flag, FlagOverrides, Node, Renderer, RendererSettings, Scene};
//!
//! let mut scene = Scene::new();
//! let no_fog = scene.add_node(Node::with_flags(FlagOverrides::new().with(Flag::Fog, false)));
//! scene.add_to_parent(Node::with_geometry(1), no_fog);
//! scene.add_node(Node::with_geometry(2));
//!
//! let mut renderer = Renderer::new(&RendererSettings::default());
//! let stats = renderer.render_frame(&scene).unwrap();
//!
//! assert_eq!(stats.draws, 2);
//! assert!(!renderer.draw_calls()[0].flags.fog());
//! assert!(renderer.draw_calls()[1].flags.fog());
//! ```

pub mod errors;
pub mod renderer;
pub mod scene;
pub mod state;

pub use errors::{Result, StrataError};
pub use renderer::{DrawCall, FrameStats, RenderContext, Renderer, RendererSettings, ShaderState};
pub use scene::{GeometryId, Node, NodeHandle, NodeVisitor, Scene, TraversalStats, walk};
pub use state::{ExportPolicy, Flag, FlagOverrides, FlagScope, FlagSink, FlagStack, RenderFlags};
