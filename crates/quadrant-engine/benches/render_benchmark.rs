// benches/render_benchmark.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quadrant_engine::material::{BlendMode, MaterialFinder};
use quadrant_engine::mesh::{Direction, Mesh, MeshBuilder, MutableQuad, QuadEmitter};
use quadrant_engine::render::{
    BufferedSinks, ItemRenderContext, ItemStack, LegacyModel, LegacyQuadHandler, Pose, PoseStack,
    QuadModel, QuadOutput, RenderRequest, TransformMode, VertexSink,
};
use quadrant_engine::ContextConfig;

/// 64 cubes worth of faces, alternating solid and translucent materials.
fn build_mesh() -> Mesh {
    let glass = MaterialFinder::new().blend_mode(BlendMode::Translucent).find();
    let mut builder = MeshBuilder::with_capacity(64 * 6);
    let mut e = builder.emitter();
    for i in 0..64 {
        for face in Direction::ALL {
            let inset = (i % 4) as f32 * 0.05;
            e.square(face, inset, inset, 1.0 - inset, 1.0 - inset, inset)
                .set_color_index(i % 2)
                .set_color_all(0, 0xFFC0_C0C0);
            if i % 3 == 0 {
                e.set_material(glass);
            }
            e.emit();
        }
    }
    builder.build()
}

struct MeshModel(Mesh);

impl QuadModel for MeshModel {
    fn emit_item_quads(&self, _stack: &ItemStack, out: &mut QuadOutput<'_>) {
        out.mesh(&self.0);
    }
}

struct RotatedMeshModel(Mesh);

impl QuadModel for RotatedMeshModel {
    fn emit_item_quads(&self, _stack: &ItemStack, out: &mut QuadOutput<'_>) {
        out.push_transform(|q: &mut MutableQuad| {
            for v in 0..4 {
                let p = q.pos(v);
                q.set_pos(v, glam::Vec3::new(p.z, p.y, 1.0 - p.x));
            }
            true
        });
        out.mesh(&self.0);
    }
}

struct NoHost;

impl LegacyQuadHandler for NoHost {
    fn render(
        &mut self,
        _model: &dyn LegacyModel,
        _stack: &ItemStack,
        _lightmap: u32,
        _overlay: u32,
        _pose: &Pose,
        _sink: &mut dyn VertexSink,
    ) {
    }
}

fn render_benchmark_fn(c: &mut Criterion) {
    let mesh = build_mesh();
    let plain = MeshModel(mesh.clone());
    let rotated = RotatedMeshModel(mesh.clone());
    let stack = ItemStack::new(1);

    let mut group = c.benchmark_group("ItemRendering");

    group.bench_function("mesh_replay_384_quads", |b| {
        let mut ctx = ItemRenderContext::new(ContextConfig::default(), |_: &ItemStack, _: i32| 0x00FF_8040);
        let mut sinks = BufferedSinks::new();
        let mut host = NoHost;

        b.iter(|| {
            sinks.clear();
            let mut pose = PoseStack::new();
            let request = RenderRequest {
                stack: &stack,
                mode: TransformMode::Gui,
                left_handed: false,
                pose: &mut pose,
                lightmap: 0x00F0_0080,
                overlay: 0,
            };
            black_box(ctx.render_model(request, black_box(&plain), &mut sinks, &mut host))
        })
    });

    group.bench_function("mesh_replay_with_transform_384_quads", |b| {
        let mut ctx = ItemRenderContext::new(ContextConfig::default(), |_: &ItemStack, _: i32| 0x00FF_8040);
        let mut sinks = BufferedSinks::new();
        let mut host = NoHost;

        b.iter(|| {
            sinks.clear();
            let mut pose = PoseStack::new();
            let request = RenderRequest {
                stack: &stack,
                mode: TransformMode::Ground,
                left_handed: false,
                pose: &mut pose,
                lightmap: 0x00F0_0080,
                overlay: 0,
            };
            black_box(ctx.render_model(request, black_box(&rotated), &mut sinks, &mut host))
        })
    });

    group.bench_function("mesh_build_384_quads", |b| b.iter(|| black_box(build_mesh())));

    group.finish();
}

criterion_group!(benches, render_benchmark_fn);
criterion_main!(benches);
