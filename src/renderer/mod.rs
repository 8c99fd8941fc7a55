//! Renderer Module
//!
//! Per-frame driver around the flag stack:
//! - [`RendererSettings`]: baseline flags and export policy
//! - [`RenderContext`]: owns the stack, exposes `begin_frame` /
//!   `prepare_consumption`
//! - [`ShaderState`]: backend sink the flags are baked into
//! - [`Renderer`]: walks a scene and records draw calls

pub mod context;
pub mod frame;
pub mod settings;
pub mod shader;

pub use context::RenderContext;
pub use frame::{DrawCall, FrameStats, Renderer};
pub use settings::RendererSettings;
pub use shader::ShaderState;
pub use crate::state::ExportPolicy;
