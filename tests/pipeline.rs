//! End-to-end draws through the public API.

use approx::assert_relative_eq;
use skinraster::prelude::*;
use skinraster::render::rasterizer::{is_inside, ScreenTriangle};

const SIZE: u32 = 100;
const NEAR: f32 = 1.0;
const FAR: f32 = 3.0;

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// Bottom-up pixel coordinates and NDC depth to an NDC position, so identity
/// uniforms put the vertex exactly there.
fn at(x: f32, y: f32, z: f32) -> Vec3 {
    let half = SIZE as f32 / 2.0;
    Vec3::new(x / half - 1.0, y / half - 1.0, z)
}

fn uniforms() -> Uniforms {
    Uniforms::new(Mat4::identity(), Mat4::identity(), NEAR, FAR).expect("identity is invertible")
}

fn triangle(renderer: &mut Renderer, corners: [Vec3; 3]) -> DrawParams {
    let store = renderer.buffers_mut();
    let buffers = MeshBuffers::new(
        store.add_positions(corners.to_vec()),
        store.add_indices(vec![[0, 1, 2]]),
    );
    DrawParams::new(buffers, uniforms())
}

/// Colour at a bottom-up pixel.
fn pixel(renderer: &Renderer, x: i32, y: i32) -> Vec4 {
    renderer
        .render_target()
        .get_color(x, SIZE as i32 - 1 - y)
}

fn depth(renderer: &Renderer, x: usize, y: usize) -> f32 {
    renderer.depth_buffer()[y * SIZE as usize + x]
}

fn fresh_renderer() -> Renderer {
    let mut renderer = Renderer::new(SIZE, SIZE);
    renderer.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
    renderer.clear_depth();
    renderer
}

/// Where the renderer places `corners` on screen under identity uniforms.
fn screen_triangle(corners: [Vec3; 3]) -> ScreenTriangle {
    let size = SIZE as f32;
    ScreenTriangle::new(corners.map(|c| {
        Vec4::new((c.x + 1.0) / 2.0 * size, (c.y + 1.0) / 2.0 * size, c.z, 1.0)
    }))
}

/// Bottom-up pixels whose centre passes the inside test.
fn inside_pixels(triangle: &ScreenTriangle) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    for y in 0..SIZE as i32 {
        for x in 0..SIZE as i32 {
            if is_inside(triangle, Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

/// Bottom-up pixels that are not the clear colour.
fn coloured_pixels(renderer: &Renderer) -> Vec<(i32, i32)> {
    let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
    let mut pixels = Vec::new();
    for y in 0..SIZE as i32 {
        for x in 0..SIZE as i32 {
            if pixel(renderer, x, y) != black {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[test]
fn triangle_covers_exactly_its_inside_pixels() {
    let mut renderer = fresh_renderer();
    let corners = [at(10.0, 10.0, 0.0), at(50.0, 10.0, 0.0), at(10.0, 50.0, 0.0)];
    let params = triangle(&mut renderer, corners);
    renderer
        .draw(&params, &FlatShader::new(RED), &TextureRegistry::new())
        .expect("valid draw");

    let expected = inside_pixels(&screen_triangle(corners));
    assert!(!expected.is_empty());
    assert_eq!(coloured_pixels(&renderer), expected);
    for &(x, y) in &expected {
        assert_eq!(pixel(&renderer, x, y), RED);
        // NDC z = 0 lands halfway between the planes
        assert_relative_eq!(depth(&renderer, x as usize, y as usize), 2.0, epsilon = 1e-5);
    }
    assert_eq!(depth(&renderer, 60, 60), 0.0);
}

#[test]
fn equal_depth_keeps_the_first_fragment() {
    let mut renderer = fresh_renderer();
    let textures = TextureRegistry::new();
    let corners = [at(10.0, 10.0, 0.0), at(50.0, 10.0, 0.0), at(10.0, 50.0, 0.0)];

    let first = triangle(&mut renderer, corners);
    renderer
        .draw(&first, &FlatShader::new(RED), &textures)
        .expect("valid draw");
    let after_first = renderer.render_target().pixels().to_vec();

    let second = triangle(&mut renderer, corners);
    renderer
        .draw(&second, &FlatShader::new(GREEN), &textures)
        .expect("valid draw");
    assert_eq!(renderer.render_target().pixels(), &after_first[..]);

    // Larger depth is closer and wins everywhere the triangle covers.
    let closer = triangle(&mut renderer, corners.map(|c| Vec3::new(c.x, c.y, 0.5)));
    renderer
        .draw(&closer, &FlatShader::new(BLUE), &textures)
        .expect("valid draw");
    for (x, y) in inside_pixels(&screen_triangle(corners)) {
        assert_eq!(pixel(&renderer, x, y), BLUE);
    }
    assert_relative_eq!(depth(&renderer, 20, 20), 2.5, epsilon = 1e-5);
}

#[test]
fn clockwise_triangles_are_culled() {
    let mut renderer = fresh_renderer();
    let params = triangle(
        &mut renderer,
        [at(10.0, 10.0, 0.0), at(10.0, 50.0, 0.0), at(50.0, 10.0, 0.0)],
    );
    renderer
        .draw(&params, &FlatShader::new(RED), &TextureRegistry::new())
        .expect("valid draw");
    assert_eq!(pixel(&renderer, 20, 20), Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(depth(&renderer, 20, 20), 0.0);
}

#[test]
fn bone_transforms_move_skinned_vertices() {
    let mut renderer = fresh_renderer();
    let mut params = triangle(
        &mut renderer,
        [at(10.0, 10.0, 0.0), at(50.0, 10.0, 0.0), at(10.0, 50.0, 0.0)],
    );
    let weights = renderer
        .buffers_mut()
        .add_bone_weights(vec![vec![VertexWeight::new(0, 1.0)]; 3]);
    params.buffers.bone_weights = Some(weights);
    // 0.8 NDC units is 40 pixels to the right.
    params.bone_transforms = vec![Mat4::translation(0.8, 0.0, 0.0)];

    renderer
        .draw(&params, &FlatShader::new(RED), &TextureRegistry::new())
        .expect("valid draw");
    assert_eq!(pixel(&renderer, 20, 20), Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(pixel(&renderer, 60, 20), RED);
}

#[test]
fn rejected_draw_leaves_targets_untouched() {
    let mut renderer = fresh_renderer();
    let mut params = triangle(
        &mut renderer,
        [at(10.0, 10.0, 0.0), at(50.0, 10.0, 0.0), at(10.0, 50.0, 0.0)],
    );
    let short = renderer.buffers_mut().add_normals(vec![Vec3::BACK; 2]);
    params.buffers.normals = Some(short);

    let err = renderer
        .draw(&params, &FlatShader::new(RED), &TextureRegistry::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::BufferLengthMismatch { expected: 3, actual: 2, .. }));
    assert_eq!(pixel(&renderer, 20, 20), Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert!(renderer.depth_buffer().iter().all(|&d| d == 0.0));
}

#[test]
fn phong_lights_a_model_through_the_camera() {
    let mut renderer = Renderer::new(SIZE, SIZE);
    renderer.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
    renderer.clear_depth();

    let mut mesh = Mesh::new(
        "quad",
        vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    );
    mesh.set_normals(vec![Vec3::BACK; 4]);
    let mut model = Model::new("scene");
    model.add_mesh(mesh);
    model.upload(renderer.buffers_mut());

    let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0));
    let uniforms = Uniforms::new(
        camera.view_matrix(),
        Mat4::perspective(45.0, 1.0, 0.1, 50.0),
        0.1,
        50.0,
    )
    .expect("invertible view");
    let lights = [PointLight::white(Vec3::ZERO, 25.0)];
    model
        .draw(&mut renderer, &PhongShader, uniforms, &lights, Primitive::Triangle, 0.0)
        .expect("valid draw");

    // The quad faces the camera and the light sits at the eye: I/r² = 1 and
    // n·l = 1 at the centre, so the default Kd of 0.8 comes straight through.
    let centre = renderer.render_target().get_color(50, 50);
    assert_relative_eq!(centre.x, 0.8, epsilon = 0.01);
    assert_eq!(pixel(&renderer, 1, 1), Vec4::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn point_mode_plots_vertices() {
    let mut renderer = fresh_renderer();
    let mut params = triangle(
        &mut renderer,
        [at(10.5, 10.5, 0.0), at(50.5, 10.5, 0.0), at(10.5, 50.5, 0.0)],
    );
    params.primitive = Primitive::Point;
    renderer
        .draw(&params, &FlatShader::new(GREEN), &TextureRegistry::new())
        .expect("valid draw");
    assert_eq!(pixel(&renderer, 10, 10), RED);
    assert_eq!(pixel(&renderer, 50, 10), RED);
    assert_eq!(pixel(&renderer, 20, 20), Vec4::new(0.0, 0.0, 0.0, 1.0));
}
