use anyhow::{Context, Result};
use glam::Vec3;
use log::info;

use quadrant_engine::logging::{init_logging, LoggingConfig};
use quadrant_engine::material::{BlendMode, MaterialFinder};
use quadrant_engine::mesh::{Direction, LegacyQuad, Mesh, MeshBuilder, MutableQuad, QuadEmitter};
use quadrant_engine::paint::pack_lightmap;
use quadrant_engine::render::{
    BufferedSinks, ItemRenderContext, ItemStack, LegacyModel, LegacyQuadHandler,
    ModelTransformation, Pose, PoseStack, QuadModel, QuadOutput, RenderRequest, TransformMode,
    Transformation, VertexSink,
};
use quadrant_engine::ContextConfig;

/// A block-shaped item: a tinted cube mesh plus a translucent inset pane.
struct CubeItem {
    mesh: Mesh,
    transformation: ModelTransformation,
}

impl CubeItem {
    fn new() -> Self {
        let glass = MaterialFinder::new().blend_mode(BlendMode::Translucent).find();
        let mut builder = MeshBuilder::with_capacity(7);
        let mut e = builder.emitter();
        for face in Direction::ALL {
            e.square(face, 0.0, 0.0, 1.0, 1.0, 0.0)
                .set_color_index(0)
                .set_color_all(0, 0xFFFF_FFFF);
            e.emit();
        }
        e.square(Direction::South, 0.25, 0.25, 0.75, 0.75, 0.5)
            .set_material(glass)
            .set_color_all(0, 0x80FF_FFFF);
        e.emit();

        let transformation = ModelTransformation {
            gui: Transformation::new(
                Vec3::new(30.0, 225.0, 0.0),
                Vec3::ZERO,
                Vec3::splat(0.625),
            ),
            ground: Transformation::new(Vec3::ZERO, Vec3::new(0.0, 0.1875, 0.0), Vec3::splat(0.25)),
            ..ModelTransformation::NONE
        };

        Self { mesh: builder.build(), transformation }
    }
}

impl QuadModel for CubeItem {
    fn emit_item_quads(&self, stack: &ItemStack, out: &mut QuadOutput<'_>) {
        out.mesh(&self.mesh);
        if stack.glint {
            // Flat sparkle quad, only on enchanted stacks.
            let mut e = out.emitter();
            let bright = MaterialFinder::new().emissive(true).find();
            e.square(Direction::Up, 0.4, 0.4, 0.6, 0.6, 0.0).set_material(bright);
            e.set_color_all(0, 0xFFFF_FF80);
            e.emit();
        }
    }

    fn transformation(&self) -> &ModelTransformation {
        &self.transformation
    }
}

/// Legacy flat item rendered through the fallback path.
struct FlatItem {
    quads: Vec<LegacyQuad>,
}

impl FlatItem {
    fn new() -> Self {
        let mut front = MutableQuad::new();
        front.square(Direction::South, 0.0, 0.0, 1.0, 1.0, 0.5);
        front.set_color_all(0, 0xFFFF_FFFF);
        let quad = LegacyQuad {
            vertex_data: front.legacy_vertex_data(),
            face: Direction::South,
            color_index: -1,
            shade: true,
        };
        Self { quads: vec![quad] }
    }
}

impl LegacyModel for FlatItem {
    fn quads(&self, cull_face: Option<Direction>, _seed: u64) -> &[LegacyQuad] {
        if cull_face.is_none() { &self.quads[..] } else { &[] }
    }
}

struct FlatModel(FlatItem);

impl QuadModel for FlatModel {
    fn emit_item_quads(&self, _stack: &ItemStack, out: &mut QuadOutput<'_>) {
        out.fallback(&self.0);
    }
}

/// Flips every quad upside down so the fallback has to convert.
struct UpsideDown(FlatModel);

impl QuadModel for UpsideDown {
    fn emit_item_quads(&self, stack: &ItemStack, out: &mut QuadOutput<'_>) {
        out.push_transform(|q: &mut MutableQuad| {
            for v in 0..4 {
                let p = q.pos(v);
                q.set_pos(v, Vec3::new(p.x, 1.0 - p.y, p.z));
            }
            true
        });
        self.0.emit_item_quads(stack, out);
        out.pop_transform();
    }
}

/// Stand-in for the host's own legacy renderer: counts what it is handed.
#[derive(Default)]
struct HostRenderer {
    models: usize,
}

impl LegacyQuadHandler for HostRenderer {
    fn render(
        &mut self,
        model: &dyn LegacyModel,
        _stack: &ItemStack,
        _lightmap: u32,
        _overlay: u32,
        _pose: &Pose,
        _sink: &mut dyn VertexSink,
    ) {
        self.models += 1;
        let quads = model.quads(None, quadrant_engine::render::ITEM_RANDOM_SEED).len();
        info!("host renders legacy model ({quads} unculled quads)");
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let palette = |stack: &ItemStack, _index: i32| if stack.item == 2 { 0x0040_A0FF } else { 0x00FF_FFFF };
    let mut ctx = ItemRenderContext::new(ContextConfig::default(), palette);
    let mut sinks = BufferedSinks::new();
    let mut host = HostRenderer::default();

    let cube = CubeItem::new();
    let flat = FlatModel(FlatItem::new());
    let flipped = UpsideDown(FlatModel(FlatItem::new()));

    let jobs: [(&str, &dyn QuadModel, ItemStack, TransformMode); 4] = [
        ("cube/gui", &cube, ItemStack::new(2), TransformMode::Gui),
        ("cube/ground", &cube, ItemStack::new(2).with_glint(true), TransformMode::Ground),
        ("flat/hand", &flat, ItemStack::new(3), TransformMode::FirstPersonRightHand),
        ("flat/flipped", &flipped, ItemStack::new(3), TransformMode::Fixed),
    ];

    for (name, model, stack, mode) in &jobs {
        let mut pose = PoseStack::new();
        let request = RenderRequest {
            stack,
            mode: *mode,
            left_handed: false,
            pose: &mut pose,
            lightmap: pack_lightmap(8, 15),
            overlay: 0,
        };
        let stats = ctx
            .render_model(request, *model, &mut sinks, &mut host)
            .with_context(|| format!("rendering {name}"))?;
        info!("{name}: {stats:?}");
    }

    for (layer, glint, buffer) in sinks.iter() {
        info!(
            "{layer:?}{}: {} quads, {} bytes",
            if glint { " +glint" } else { "" },
            buffer.quad_count(),
            buffer.as_bytes().len()
        );
    }
    info!("host handled {} legacy models", host.models);

    if let Some(path) = std::env::args().nth(1) {
        let bytes: Vec<u8> = sinks.iter().flat_map(|(_, _, b)| b.as_bytes().to_vec()).collect();
        std::fs::write(&path, &bytes).with_context(|| format!("writing vertex dump to {path}"))?;
        info!("wrote {} bytes to {path}", bytes.len());
    }

    Ok(())
}
