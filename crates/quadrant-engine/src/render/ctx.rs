use std::ops::{Deref, DerefMut};

use glam::Vec3;
use log::{debug, trace, warn};

use crate::config::ContextConfig;
use crate::error::RenderError;
use crate::material::{BlendMode, Material};
use crate::mesh::{Direction, Mesh, MutableQuad, QuadEmitter, TOTAL_STRIDE};
use crate::paint::{max_brightness, multiply_color, scale_rgb, FULL_BRIGHTNESS, OPAQUE, WHITE};

use super::model::{
    AoCalculator, ColorPalette, ItemStack, LegacyModel, LegacyQuadHandler, QuadModel,
    ITEM_RANDOM_SEED,
};
use super::pose::{Pose, PoseStack, TransformMode};
use super::sink::{SinkId, SinkLayer, SinkProvider, SinkVertex, VertexSink};

/// Per-quad hook run before lighting. Returning `false` drops the quad.
pub trait QuadTransform {
    fn transform(&mut self, quad: &mut MutableQuad) -> bool;
}

impl<F> QuadTransform for F
where
    F: FnMut(&mut MutableQuad) -> bool,
{
    fn transform(&mut self, quad: &mut MutableQuad) -> bool {
        self(quad)
    }
}

/// Inputs of one render call.
pub struct RenderRequest<'a> {
    pub stack: &'a ItemStack,
    pub mode: TransformMode,
    /// Mirror the model transformation for the left hand.
    pub left_handed: bool,
    pub pose: &'a mut PoseStack,
    /// Ambient lightmap (see `paint::light`).
    pub lightmap: u32,
    pub overlay: u32,
}

/// Counters for one render call.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Quads emitted directly through an emitter.
    pub emitted: usize,
    /// Quads replayed from meshes.
    pub replayed: usize,
    /// Legacy quads converted and run through the pipeline.
    pub converted: usize,
    /// Legacy models handed to the host unchanged.
    pub forwarded: usize,
    /// Quads dropped by a transform.
    pub skipped: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Armed,
    Emitting,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Armed => "armed",
            Phase::Emitting => "emitting",
        }
    }
}

/// Per-call values fixed while a model emits.
struct Frame<'a> {
    stack: &'a ItemStack,
    mode: TransformMode,
    pose: Pose,
    lightmap: u32,
    overlay: u32,
    model_layer: SinkLayer,
}

/// Renders quad models for items.
///
/// Owns the single editor quad shared by every quad source. One context
/// renders one model at a time; it is meant to live on the render thread and
/// be reused across calls.
pub struct ItemRenderContext {
    config: ContextConfig,
    palette: Box<dyn ColorPalette>,
    ao: Option<Box<dyn AoCalculator>>,
    editor: MutableQuad,
    transforms: Vec<Box<dyn QuadTransform>>,
    /// Sink of the model's own layer, resolved on first use.
    model_sink: Option<SinkId>,
    /// Last non-default blend mode and the sink it resolved to.
    quad_sink: Option<(BlendMode, SinkId)>,
    phase: Phase,
    stats: RenderStats,
}

impl ItemRenderContext {
    pub fn new(config: ContextConfig, palette: impl ColorPalette + 'static) -> Self {
        Self {
            config,
            palette: Box::new(palette),
            ao: None,
            editor: MutableQuad::new(),
            transforms: Vec::new(),
            model_sink: None,
            quad_sink: None,
            phase: Phase::Idle,
            stats: RenderStats::default(),
        }
    }

    pub fn with_ao(mut self, ao: impl AoCalculator + 'static) -> Self {
        self.ao = Some(Box::new(ao));
        self
    }

    #[inline]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// True while a render call is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Renders `model` for `request.stack` into `sinks`.
    ///
    /// The model transformation for `request.mode` is applied to the pose,
    /// followed by a half-block offset so models authored in `0..1` center on
    /// the origin. The pose stack is restored before returning.
    ///
    /// Fails with [`RenderError::Reentrant`] when the context is not idle,
    /// which happens after a model panicked mid-call until [`reset`](Self::reset).
    pub fn render_model(
        &mut self,
        request: RenderRequest<'_>,
        model: &dyn QuadModel,
        sinks: &mut dyn SinkProvider,
        legacy: &mut dyn LegacyQuadHandler,
    ) -> Result<RenderStats, RenderError> {
        self.arm()?;

        let RenderRequest { stack, mode, left_handed, pose, lightmap, overlay } = request;

        pose.push();
        model.transformation().get(mode).apply(left_handed, pose);
        pose.translate(Vec3::splat(-0.5));

        let frame = Frame {
            stack,
            mode,
            pose: *pose.top(),
            lightmap,
            overlay,
            model_layer: self.select_layer(mode, SinkLayer::Item),
        };

        debug!("rendering item {} ({mode:?})", stack.item);
        self.phase = Phase::Emitting;
        {
            let mut out = QuadOutput { ctx: &mut *self, frame, sinks, legacy };
            model.emit_item_quads(stack, &mut out);
        }

        pose.pop();
        Ok(self.disarm())
    }

    /// Forces the context back to idle after an interrupted call.
    pub fn reset(&mut self) {
        if self.phase != Phase::Idle {
            warn!("resetting render context left {}", self.phase.name());
        }
        self.disarm();
    }

    fn arm(&mut self) -> Result<(), RenderError> {
        if self.phase != Phase::Idle {
            let phase = self.phase.name();
            warn!("rejected nested render call; context is {phase}");
            return Err(RenderError::Reentrant { phase });
        }
        self.phase = Phase::Armed;
        self.editor.clear();
        self.stats = RenderStats::default();
        Ok(())
    }

    fn disarm(&mut self) -> RenderStats {
        self.editor.clear();
        self.transforms.clear();
        self.model_sink = None;
        self.quad_sink = None;
        self.phase = Phase::Idle;
        let stats = std::mem::take(&mut self.stats);
        debug!("render finished: {stats:?}");
        stats
    }

    fn select_layer(&self, mode: TransformMode, layer: SinkLayer) -> SinkLayer {
        if mode == TransformMode::Gui && self.config.gui_forces_translucent {
            SinkLayer::TranslucentCull
        } else {
            layer
        }
    }

    fn model_sink(&mut self, frame: &Frame<'_>, sinks: &mut dyn SinkProvider) -> SinkId {
        *self
            .model_sink
            .get_or_insert_with(|| sinks.resolve(frame.model_layer, frame.stack.glint))
    }

    /// Sink for a quad's blend mode.
    ///
    /// `Default` uses the model's sink. `Translucent` keeps its own layer;
    /// every other explicit mode collapses to cutout. The provider is only
    /// asked again when the collapsed mode changes.
    fn quad_sink(
        &mut self,
        blend: BlendMode,
        frame: &Frame<'_>,
        sinks: &mut dyn SinkProvider,
    ) -> SinkId {
        if blend == BlendMode::Default {
            return self.model_sink(frame, sinks);
        }

        let blend = match blend {
            BlendMode::Translucent => BlendMode::Translucent,
            _ => BlendMode::Cutout,
        };

        if let Some((cached, id)) = self.quad_sink {
            if cached == blend {
                return id;
            }
        }

        let layer = match blend {
            BlendMode::Translucent => SinkLayer::TranslucentCull,
            _ => SinkLayer::Cutout,
        };
        let layer = self.select_layer(frame.mode, layer);
        trace!("blend mode {blend:?} resolved to {layer:?}");
        let id = sinks.resolve(layer, frame.stack.glint);
        self.quad_sink = Some((blend, id));
        id
    }

    /// Tint for a color index, with alpha forced opaque.
    fn index_color(&self, stack: &ItemStack, index: i32) -> u32 {
        if index == -1 {
            WHITE
        } else {
            self.palette.color(stack, index) | OPAQUE
        }
    }

    /// Runs the editor quad through transforms, tint, lighting and into a sink.
    fn render_quad(&mut self, frame: &Frame<'_>, sinks: &mut dyn SinkProvider) -> bool {
        for t in self.transforms.iter_mut() {
            if !t.transform(&mut self.editor) {
                trace!("quad dropped by transform (tag {})", self.editor.tag());
                self.stats.skipped += 1;
                return false;
            }
        }

        let material = self.editor.material();
        let sink = self.quad_sink(material.blend_mode(), frame, sinks);
        let tint = if material.disable_color_index() {
            WHITE
        } else {
            self.index_color(frame.stack, self.editor.color_index())
        };
        let lightmap = if material.emissive() { FULL_BRIGHTNESS } else { frame.lightmap };

        let ao = match self.ao.as_mut() {
            Some(ao) if self.config.ambient_occlusion && !material.disable_ao() => {
                Some(ao.compute(&self.editor))
            }
            _ => None,
        };

        let order = self.config.color_order;
        let quad = &mut self.editor;
        for v in 0..4 {
            let mut color = multiply_color(tint, quad.sprite_color(v, 0));
            if let Some(shade) = ao {
                color = scale_rgb(color, shade[v]);
            }
            quad.set_sprite_color(v, 0, order.convert(color));
            quad.set_lightmap(v, max_brightness(quad.lightmap(v), lightmap));
        }

        buffer_quad(sinks.sink_mut(sink), quad, &frame.pose, frame.overlay);
        true
    }
}

/// Writes a finished quad to `sink` as four vertices.
///
/// Positions go through the pose matrix. With vertex normals present, any
/// missing ones are filled from the face normal and each is transformed;
/// otherwise the transformed face normal is shared by all four vertices.
pub fn buffer_quad(sink: &mut dyn VertexSink, quad: &mut MutableQuad, pose: &Pose, overlay: u32) {
    let use_normals = quad.has_vertex_normals();
    let face_normal = if use_normals {
        quad.populate_missing_normals();
        Vec3::ZERO
    } else {
        pose.transform_normal(quad.face_normal())
    };

    for v in 0..4 {
        let normal = match quad.normal(v) {
            Some(n) if use_normals => pose.transform_normal(n),
            _ => face_normal,
        };
        sink.vertex(&SinkVertex {
            position: pose.transform_point(quad.pos(v)).to_array(),
            color: quad.sprite_color(v, 0),
            uv: quad.sprite_uv(v, 0).to_array(),
            overlay,
            lightmap: quad.lightmap(v),
            normal: normal.to_array(),
        });
    }
}

/// The quad sources available to a model during [`ItemRenderContext::render_model`].
pub struct QuadOutput<'a> {
    ctx: &'a mut ItemRenderContext,
    frame: Frame<'a>,
    sinks: &'a mut dyn SinkProvider,
    legacy: &'a mut dyn LegacyQuadHandler,
}

impl<'a> QuadOutput<'a> {
    /// Emitter over the context's editor quad, cleared.
    pub fn emitter(&mut self) -> ContextEmitter<'_, 'a> {
        self.ctx.editor.clear();
        ContextEmitter { out: self }
    }

    /// Replays every quad of `mesh` in order.
    pub fn mesh(&mut self, mesh: &Mesh) {
        for words in mesh.words().chunks_exact(TOTAL_STRIDE) {
            self.ctx.editor.data.copy_from_slice(words);
            self.ctx.editor.reload();
            self.ctx.stats.replayed += 1;
            self.ctx.render_quad(&self.frame, self.sinks);
        }
    }

    /// Renders a legacy model.
    ///
    /// Without transforms the host renders it unchanged into the model's
    /// sink. With a transform active, every quad (each cull face, then the
    /// unculled ones) is converted with the standard material and pushed
    /// through the pipeline.
    pub fn fallback(&mut self, model: &dyn LegacyModel) {
        if !self.has_transform() {
            let id = self.ctx.model_sink(&self.frame, self.sinks);
            let sink = self.sinks.sink_mut(id);
            self.legacy.render(
                model,
                self.frame.stack,
                self.frame.lightmap,
                self.frame.overlay,
                &self.frame.pose,
                sink,
            );
            self.ctx.stats.forwarded += 1;
            return;
        }

        let faces = Direction::ALL.into_iter().map(Some).chain([None]);
        for cull_face in faces {
            for quad in model.quads(cull_face, ITEM_RANDOM_SEED) {
                self.ctx.editor.load_legacy(quad, Material::STANDARD, cull_face);
                self.ctx.stats.converted += 1;
                self.ctx.render_quad(&self.frame, self.sinks);
            }
        }
    }

    /// Adds a transform for the rest of this call. Transforms run in push order.
    pub fn push_transform(&mut self, transform: impl QuadTransform + 'static) {
        self.ctx.transforms.push(Box::new(transform));
    }

    pub fn pop_transform(&mut self) {
        self.ctx.transforms.pop();
    }

    #[inline]
    pub fn has_transform(&self) -> bool {
        !self.ctx.transforms.is_empty()
    }

    #[inline]
    pub fn stack(&self) -> &ItemStack {
        self.frame.stack
    }

    #[inline]
    pub fn mode(&self) -> TransformMode {
        self.frame.mode
    }
}

/// Emitter handed out by [`QuadOutput::emitter`]. Each `emit` renders immediately.
pub struct ContextEmitter<'o, 'a> {
    out: &'o mut QuadOutput<'a>,
}

impl Deref for ContextEmitter<'_, '_> {
    type Target = MutableQuad;

    fn deref(&self) -> &MutableQuad {
        &self.out.ctx.editor
    }
}

impl DerefMut for ContextEmitter<'_, '_> {
    fn deref_mut(&mut self) -> &mut MutableQuad {
        &mut self.out.ctx.editor
    }
}

impl QuadEmitter for ContextEmitter<'_, '_> {
    fn emit(&mut self) -> &mut Self {
        let out = &mut *self.out;
        out.ctx.editor.compute_geometry();
        out.ctx.stats.emitted += 1;
        out.ctx.render_quad(&out.frame, out.sinks);
        out.ctx.editor.clear();
        self
    }
}
