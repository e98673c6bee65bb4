use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skinraster::prelude::*;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

/// Pixel coordinates (bottom-up) to NDC, so identity uniforms place
/// vertices exactly where the numbers say.
fn to_ndc(x: f32, y: f32) -> Vec3 {
    Vec3::new(
        x / BUFFER_WIDTH as f32 * 2.0 - 1.0,
        y / BUFFER_HEIGHT as f32 * 2.0 - 1.0,
        0.0,
    )
}

fn identity_uniforms() -> Uniforms {
    Uniforms::new(Mat4::identity(), Mat4::identity(), 0.1, 50.0).expect("identity is invertible")
}

fn upload(renderer: &mut Renderer, triangles: &[[(f32, f32); 3]]) -> DrawParams {
    let positions = triangles
        .iter()
        .flat_map(|tri| tri.iter().map(|&(x, y)| to_ndc(x, y)))
        .collect();
    let indices = (0..triangles.len() as u32)
        .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
        .collect();
    let store = renderer.buffers_mut();
    let buffers = MeshBuffers::new(store.add_positions(positions), store.add_indices(indices));
    DrawParams::new(buffers, identity_uniforms())
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let shader = FlatShader::new(Vec4::new(1.0, 0.0, 0.0, 1.0));
    let textures = TextureRegistry::new();

    for (name, triangle) in [
        ("small", [(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)]),
        ("medium", [(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)]),
        ("large", [(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)]),
    ] {
        let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let params = upload(&mut renderer, &[triangle]);
        group.bench_with_input(BenchmarkId::new("flat", name), &params, |b, params| {
            b.iter(|| {
                renderer.clear_depth();
                renderer
                    .draw(black_box(params), &shader, &textures)
                    .expect("valid draw");
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");
    let textures = TextureRegistry::new();

    // Generate a grid of small triangles
    let triangles: Vec<[(f32, f32); 3]> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                [(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)]
            })
        })
        .collect();

    let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
    let mut params = upload(&mut renderer, &triangles);

    group.bench_function("flat_400_triangles", |b| {
        let shader = FlatShader::new(Vec4::new(1.0, 0.0, 0.0, 1.0));
        b.iter(|| {
            renderer.clear_depth();
            renderer
                .draw(black_box(&params), &shader, &textures)
                .expect("valid draw");
        });
    });

    params.lights = vec![PointLight::white(Vec3::new(0.0, 0.0, 5.0), 100.0)];
    group.bench_function("phong_400_triangles", |b| {
        b.iter(|| {
            renderer.clear_depth();
            renderer
                .draw(black_box(&params), &PhongShader, &textures)
                .expect("valid draw");
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
