//! Headless demo: renders a model for the configured number of frames and
//! writes the last one to `frame.png`.
//!
//! ```text
//! skinraster [config.ron] [model.obj] [--points]
//! ```
//!
//! Without a model, a procedural two-bone strip is rendered bending back
//! and forth.

use std::error::Error;

use skinraster::prelude::*;

const OUTPUT: &str = "frame.png";

/// Half-width and bone length of the procedural strip, in model units.
const STRIP_HALF_WIDTH: f32 = 10.0;
const STRIP_BONE_LENGTH: f32 = 20.0;
/// Quads per bone along the strip.
const STRIP_SEGMENTS: u32 = 4;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let primitive = if args.iter().any(|a| a == "--points") {
        Primitive::Point
    } else {
        Primitive::Triangle
    };
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));

    let config = match paths.next() {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let mut model = match paths.next() {
        Some(path) => Model::from_obj(path)?,
        None => skinned_strip(),
    };

    let mut renderer = Renderer::new(config.width, config.height);
    model.upload(renderer.buffers_mut());

    let camera = Camera::new(config.camera_position());
    let view = camera.view_matrix();
    let projection = config.projection();
    let lights = config.point_lights();
    let scale = config.model_scale;

    for frame in 0..config.frames {
        renderer.clear_color(config.clear_color());
        renderer.clear_depth();

        let spin = frame as f32 * config.spin_degrees_per_frame;
        let model_matrix = Mat4::rotation_y(spin) * Mat4::scaling(scale, scale, scale);
        let Some(uniforms) =
            Uniforms::new(view * model_matrix, projection, config.z_near, config.z_far)
        else {
            log::warn!("frame {frame}: model-view matrix is singular, skipping");
            continue;
        };

        let seconds = frame as f32 * config.frame_seconds;
        if let Err(err) =
            model.draw(&mut renderer, &PhongShader, uniforms, &lights, primitive, seconds)
        {
            log::warn!("frame {frame}: drawn with meshes missing ({err})");
        }
    }

    renderer.render_target().to_rgba_image().save(OUTPUT)?;
    log::info!(
        "wrote {OUTPUT} ({}x{}, {} frames)",
        renderer.width(),
        renderer.height(),
        config.frames
    );
    Ok(())
}

/// A vertical strip skinned to two bones, `lower` and `upper`, with the
/// upper bone swinging about Z.
fn skinned_strip() -> Model {
    let rows = STRIP_SEGMENTS * 2 + 1;
    let height = STRIP_BONE_LENGTH * 2.0;
    let step = height / (rows - 1) as f32;

    let mut positions = Vec::new();
    let mut weights = Vec::new();
    for row in 0..rows {
        let y = row as f32 * step - STRIP_BONE_LENGTH;
        let influences = match row.cmp(&STRIP_SEGMENTS) {
            std::cmp::Ordering::Less => vec![VertexWeight::new(0, 1.0)],
            std::cmp::Ordering::Equal => {
                vec![VertexWeight::new(0, 0.5), VertexWeight::new(1, 0.5)]
            }
            std::cmp::Ordering::Greater => vec![VertexWeight::new(1, 1.0)],
        };
        for x in [-STRIP_HALF_WIDTH, STRIP_HALF_WIDTH] {
            positions.push(Vec3::new(x, y, 0.0));
            weights.push(influences.clone());
        }
    }

    // Counter-clockwise seen from +Z.
    let indices = (0..rows - 1)
        .flat_map(|row| {
            let (bl, br) = (row * 2, row * 2 + 1);
            let (tl, tr) = (bl + 2, br + 2);
            [[bl, br, tr], [bl, tr, tl]]
        })
        .collect();

    let count = positions.len();
    let mut mesh = Mesh::new("strip", positions, indices);
    mesh.set_normals(vec![Vec3::BACK; count]);
    mesh.set_uvs(vec![Vec2::ZERO; count]);
    mesh.set_bone_weights(weights);
    mesh.set_material(Material {
        ambient: Vec3::new(0.005, 0.005, 0.005),
        diffuse: Vec3::new(0.9, 0.6, 0.3),
        specular: Vec3::new(0.3, 0.3, 0.3),
        shininess: 16.0,
        ..Material::default()
    });

    // Bind pose: lower bone at the strip's bottom, upper bone at its middle.
    let mut scene = NodeTree::new("lower", Mat4::translation(0.0, -STRIP_BONE_LENGTH, 0.0));
    if let Some(root) = scene.root() {
        scene.add_child(root, "upper", Mat4::translation(0.0, STRIP_BONE_LENGTH, 0.0));
    }

    // Each offset undoes its node's bind-pose placement.
    let skeleton = mesh.skeleton_mut();
    for name in ["lower", "upper"] {
        let offset = scene
            .find(name)
            .and_then(|id| scene.global_bind_transform(id))
            .and_then(|bind| bind.inverse())
            .unwrap_or_else(Mat4::identity);
        skeleton.add_bone(name, offset);
    }

    let mut swing = NodeChannel::new("upper");
    swing.positions = vec![Keyframe::new(0.0, Vec3::new(0.0, STRIP_BONE_LENGTH, 0.0))];
    swing.rotations = vec![
        Keyframe::new(0.0, Quat::IDENTITY),
        Keyframe::new(25.0, Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 60.0)),
        Keyframe::new(50.0, Quat::IDENTITY),
    ];
    let mut clip = Animation::new("swing", 25.0, 50.0);
    clip.add_channel(swing);

    let mut model = Model::new("strip");
    model.add_mesh(mesh);
    model.set_animation(scene, clip);
    model
}
