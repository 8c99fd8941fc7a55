//! Frame Rendering
//!
//! Drives one frame over a [`Scene`]:
//!
//! 1. [`RenderContext::begin_frame`] resets the flag stack
//! 2. [`walk`] brackets every node with push/pop
//! 3. before each draw, the dirty flags are exported to the [`ShaderState`]
//! 4. the draw is recorded with the flags it was baked with
//!
//! Geometry under `visible: false` goes through the whole traversal but no
//! draw call is emitted for it. A renderer built with a geometry registry
//! aborts the frame when a visible node references an id it does not know.

use std::collections::HashSet;

use crate::errors::{Result, StrataError};
use crate::renderer::context::RenderContext;
use crate::renderer::settings::RendererSettings;
use crate::renderer::shader::ShaderState;
use crate::scene::{GeometryId, Node, NodeHandle, NodeVisitor, Scene, walk};
use crate::state::{FlagStack, RenderFlags};

/// One recorded draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub node: NodeHandle,
    pub geometry: GeometryId,
    /// Flags baked into the draw.
    pub flags: RenderFlags,
    /// Whether the draw participates in picking.
    pub pickable: bool,
    /// Shader state version the draw was issued against.
    pub state_version: u64,
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub visited: usize,
    pub culled: usize,
    pub draws: usize,
    /// Geometry skipped because `visible` was false.
    pub hidden: usize,
    /// Flag exports delivered to the shader state this frame.
    pub exports: usize,
    pub max_depth: usize,
}

/// Renders scenes into a list of draw calls.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    context: RenderContext,
    shader: ShaderState,
    draws: Vec<DrawCall>,
    /// Known geometry ids. `None` accepts any id.
    geometries: Option<HashSet<GeometryId>>,
}

impl Renderer {
    #[must_use]
    pub fn new(settings: &RendererSettings) -> Self {
        Self {
            context: RenderContext::new(settings),
            shader: ShaderState::new(),
            draws: Vec::new(),
            geometries: None,
        }
    }

    /// Creates a renderer that only draws the given geometry ids.
    #[must_use]
    pub fn with_geometry_registry(
        settings: &RendererSettings,
        geometries: impl IntoIterator<Item = GeometryId>,
    ) -> Self {
        Self {
            geometries: Some(geometries.into_iter().collect()),
            ..Self::new(settings)
        }
    }

    /// Renders one frame of `scene`.
    ///
    /// On error the frame is aborted: the flag stack is reset and the draws
    /// recorded so far are discarded.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<FrameStats> {
        self.draws.clear();
        self.context.begin_frame();

        let mut collector = DrawCollector {
            shader: &mut self.shader,
            draws: &mut self.draws,
            geometries: self.geometries.as_ref(),
            hidden: 0,
            exports: 0,
        };

        let traversal = match walk(scene, self.context.stack_mut(), &mut collector) {
            Ok(traversal) => traversal,
            Err(err) => {
                self.draws.clear();
                self.context.abort_frame();
                return Err(err);
            }
        };

        let stats = FrameStats {
            frame: self.context.frame_count(),
            visited: traversal.visited,
            culled: traversal.culled,
            draws: collector.draws.len(),
            hidden: collector.hidden,
            exports: collector.exports,
            max_depth: traversal.max_depth,
        };
        log::trace!("Frame {} rendered: {stats:?}", stats.frame);
        Ok(stats)
    }

    /// Draws recorded by the last successful frame.
    #[inline]
    #[must_use]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    #[inline]
    #[must_use]
    pub fn shader(&self) -> &ShaderState {
        &self.shader
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

struct DrawCollector<'a> {
    shader: &'a mut ShaderState,
    draws: &'a mut Vec<DrawCall>,
    geometries: Option<&'a HashSet<GeometryId>>,
    hidden: usize,
    exports: usize,
}

impl NodeVisitor for DrawCollector<'_> {
    fn visit(&mut self, handle: NodeHandle, node: &Node, stack: &mut FlagStack) -> Result<()> {
        let Some(geometry) = node.geometry else {
            return Ok(());
        };

        let flags = stack.current();
        if !flags.visible() {
            self.hidden += 1;
            return Ok(());
        }

        if self
            .geometries
            .is_some_and(|known| !known.contains(&geometry))
        {
            log::warn!("Node {handle:?} references unknown geometry {geometry}");
            return Err(StrataError::UnknownGeometry { geometry });
        }

        if RenderContext::consume_from(stack, &mut *self.shader) {
            self.exports += 1;
        }

        self.draws.push(DrawCall {
            node: handle,
            geometry,
            flags: self.shader.flags(),
            pickable: flags.picking(),
            state_version: self.shader.version(),
        });
        Ok(())
    }
}
